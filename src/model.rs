//! Local entities: spheres, goals, subtasks, daily tasks
//!
//! Every entity that mirrors a remote counterpart carries an optional
//! `remote_id` — the cached foreign identifier set exactly once when the
//! entity is linked. Reconciliation always joins by `remote_id` first and
//! only falls back to name/title matching for unlinked entities.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A top-level life category, mirrored as a remote project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sphere {
    pub id: String,
    pub user_id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub color: String,
    pub icon: String,
    pub order: u32,
    pub created_at: DateTime<Utc>,
    /// Remote project ID once linked
    #[serde(default)]
    pub remote_id: Option<String>,
}

/// Goal lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalStatus {
    Active,
    Completed,
    Archived,
}

/// An ordered step within a goal, mirrored as a remote child task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subtask {
    pub id: String,
    pub title: String,
    pub completed: bool,
    /// Order index; defines the sequence under `strict_order`
    pub order: u32,
    /// Remote task ID once linked
    #[serde(default)]
    pub remote_id: Option<String>,
}

/// A commitment within a sphere, mirrored as a top-level remote task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub id: String,
    pub user_id: String,
    pub sphere_id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub status: GoalStatus,
    /// Progress percentage, 0–100; completed goals are always 100
    pub progress: u8,
    pub subtasks: Vec<Subtask>,
    /// When true, subtasks must be completed in ascending order
    pub strict_order: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Remote task ID once linked
    #[serde(default)]
    pub remote_id: Option<String>,
}

impl Goal {
    /// Whether the subtask at the given order index may be completed.
    ///
    /// Without `strict_order` every subtask is actionable; with it, a
    /// subtask at order `k` is actionable only once every subtask with a
    /// smaller order is completed.
    pub fn is_subtask_actionable(&self, order: u32) -> bool {
        if !self.strict_order {
            return true;
        }
        self.subtasks
            .iter()
            .filter(|s| s.order < order)
            .all(|s| s.completed)
    }
}

/// Difficulty of an AI-generated daily task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Label attached to the mirrored remote task
    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

/// An ephemeral AI-generated task for a single day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyTask {
    pub id: String,
    pub title: String,
    pub description: String,
    pub difficulty: Difficulty,
    pub completed: bool,
}

/// Sparse update for a sphere; `None` fields are left untouched.
///
/// `description` is doubly optional so "leave alone" and "clear" stay
/// distinct.
#[derive(Debug, Clone, Default)]
pub struct SphereUpdate {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub color: Option<String>,
    pub icon: Option<String>,
    pub order: Option<u32>,
    pub remote_id: Option<String>,
}

/// Sparse update for a goal; `None` fields are left untouched
#[derive(Debug, Clone, Default)]
pub struct GoalUpdate {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub status: Option<GoalStatus>,
    pub progress: Option<u8>,
    pub subtasks: Option<Vec<Subtask>>,
    pub strict_order: Option<bool>,
    pub remote_id: Option<String>,
}

impl GoalUpdate {
    /// True when no field is staged
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.progress.is_none()
            && self.subtasks.is_none()
            && self.strict_order.is_none()
            && self.remote_id.is_none()
    }
}

/// Sparse update for a subtask; `None` fields are left untouched
#[derive(Debug, Clone, Default)]
pub struct SubtaskUpdate {
    pub title: Option<String>,
    pub completed: Option<bool>,
    pub remote_id: Option<String>,
}

/// Generate a fresh local entity ID
pub(crate) fn new_id(prefix: &str) -> String {
    format!("{}-{}", prefix, Uuid::new_v4())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn goal_with_subtasks(strict: bool, completed: &[bool]) -> Goal {
        Goal {
            id: "g1".into(),
            user_id: "u1".into(),
            sphere_id: "s1".into(),
            title: "test".into(),
            description: None,
            status: GoalStatus::Active,
            progress: 0,
            subtasks: completed
                .iter()
                .enumerate()
                .map(|(i, &done)| Subtask {
                    id: format!("sub-{i}"),
                    title: format!("step {i}"),
                    completed: done,
                    order: i as u32,
                    remote_id: None,
                })
                .collect(),
            strict_order: strict,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            remote_id: None,
        }
    }

    #[test]
    fn test_strict_order_locks_later_subtasks() {
        let goal = goal_with_subtasks(true, &[false, false, false]);

        assert!(goal.is_subtask_actionable(0));
        assert!(!goal.is_subtask_actionable(1));
        assert!(!goal.is_subtask_actionable(2));
    }

    #[test]
    fn test_strict_order_unlocks_in_sequence() {
        let goal = goal_with_subtasks(true, &[true, false, false]);

        assert!(goal.is_subtask_actionable(1));
        assert!(!goal.is_subtask_actionable(2));
    }

    #[test]
    fn test_loose_order_everything_actionable() {
        let goal = goal_with_subtasks(false, &[false, false, false]);

        assert!(goal.is_subtask_actionable(2));
    }

    #[test]
    fn test_goal_update_is_empty() {
        assert!(GoalUpdate::default().is_empty());
        let staged = GoalUpdate {
            title: Some("new".into()),
            ..Default::default()
        };
        assert!(!staged.is_empty());
    }
}
