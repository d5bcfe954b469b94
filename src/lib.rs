//! Bidirectional sync engine between local goal spheres and a remote
//! hierarchical task manager
//!
//! Local state is a two-level hierarchy — spheres (life categories)
//! containing goals with ordered subtasks — mirrored remotely as projects,
//! top-level tasks, and child tasks under one fixed root project. The
//! engine reconciles the two sides using a weak identity mapping: every
//! local entity caches its remote counterpart's ID once linked, and
//! unlinked entities are matched by exact name within their parent so a
//! first run can adopt pre-existing remote data without duplication.
//!
//! # Example
//!
//! ```rust,no_run
//! use seeker_sync::{
//!     ClientConfig, MemoryStore, PullOptions, SyncEngine, TodoistClient,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = TodoistClient::new(ClientConfig {
//!     api_token: Some("tok".into()),
//!     ..Default::default()
//! });
//! let engine = SyncEngine::new(client);
//! let mut store = MemoryStore::new();
//!
//! // Push local scaffolding out, then fold remote edits back in
//! let pushed = engine.initial_sync(&mut store).await;
//! let pulled = engine.pull_sync(&mut store, PullOptions::default()).await;
//! println!(
//!     "created {} goals, updated {}, {} errors",
//!     pulled.goals_created,
//!     pulled.goals_updated,
//!     pushed.errors.len() + pulled.errors.len()
//! );
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
pub mod model;
pub mod store;
pub mod sync;
pub mod types;

// Re-export main types
pub use client::{TaskManager, TodoistClient};
pub use error::{Result, SyncError};
pub use model::{
    DailyTask, Difficulty, Goal, GoalStatus, GoalUpdate, Sphere, SphereUpdate, Subtask,
    SubtaskUpdate,
};
pub use store::{LocalStore, MemoryStore};
pub use sync::{PullOptions, SyncConfig, SyncEngine, SyncReport};
pub use types::ClientConfig;
