//! Per-run sync report

use serde::Serialize;

/// Structured result of one batch sync run: creation/update counts per
/// entity kind plus non-fatal error messages, in the order they occurred.
/// Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SyncReport {
    pub spheres_created: u32,
    pub spheres_updated: u32,
    pub goals_created: u32,
    pub goals_updated: u32,
    pub goals_archived: u32,
    pub subtasks_created: u32,
    pub subtasks_updated: u32,
    pub daily_tasks_pushed: u32,
    pub errors: Vec<String>,
}

impl SyncReport {
    /// True when nothing was created or updated and no error occurred
    pub fn is_noop(&self) -> bool {
        *self == SyncReport::default()
    }
}
