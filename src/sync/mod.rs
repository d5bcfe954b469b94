//! Reconciliation engine between local spheres/goals and the remote
//! task manager
//!
//! The engine exposes three batch entry points (`initial_sync`,
//! `pull_sync`, `push_daily_tasks`) plus single-entity push helpers used by
//! fine-grained UI actions. Batch syncs return a [`SyncReport`]; the push
//! helpers are best-effort and never surface failures.
//!
//! Structural mapping: sphere ↔ project one level below a fixed root
//! project, goal ↔ top-level task in that project, subtask ↔ child task of
//! the goal's task. The join key is always the entity's cached `remote_id`;
//! name/title matching is only a fallback for never-linked entities so a
//! first sync can adopt pre-existing remote data without duplicating it.

mod daily;
mod initial;
mod pull;
mod push;
mod report;
#[cfg(test)]
pub(crate) mod testing;

pub use pull::PullOptions;
pub use report::SyncReport;

use crate::client::TaskManager;

/// Fixed names and ownership defaults for one account's sync.
///
/// The named projects are resolved by lookup at the start of every batch —
/// never cached across batches, since the remote can change between runs.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Name of the single root project that parents all sphere projects
    pub root_project_name: String,
    /// Name of the project receiving daily-task pushes; never created by
    /// this engine
    pub daily_project_name: String,
    /// Owner recorded on locally synthesized entities
    pub user_id: String,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            root_project_name: "Goals 2026".to_string(),
            daily_project_name: "Seeker Daily".to_string(),
            user_id: "local".to_string(),
        }
    }
}

/// Bidirectional reconciliation engine.
///
/// Generic over the [`TaskManager`] seam so tests can drive it against an
/// in-memory fake. All remote calls are awaited sequentially; there is no
/// fan-out, which keeps per-entity error isolation trivial. Callers must
/// not run two batch syncs concurrently for the same account.
pub struct SyncEngine<C> {
    client: C,
    config: SyncConfig,
}

impl<C: TaskManager> SyncEngine<C> {
    /// Engine with default naming
    pub fn new(client: C) -> Self {
        Self::with_config(client, SyncConfig::default())
    }

    pub fn with_config(client: C, config: SyncConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    pub(crate) fn client(&self) -> &C {
        &self.client
    }
}
