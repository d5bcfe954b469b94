//! Local storage surface consumed by the sync engine
//!
//! The engine only needs simple CRUD accessors over spheres and goals; the
//! hosting application decides where state actually lives. `MemoryStore`
//! is the reference implementation, used by hosts without a persistence
//! layer and by the engine's tests.

use chrono::Utc;

use crate::model::{Goal, GoalStatus, GoalUpdate, Sphere, SphereUpdate, Subtask, SubtaskUpdate};

/// CRUD surface over locally persisted spheres and goals.
///
/// Mutations are serialized by the implementation; the engine never holds
/// references across calls.
pub trait LocalStore {
    fn spheres(&self) -> Vec<Sphere>;
    fn goals(&self) -> Vec<Goal>;

    fn add_sphere(&mut self, sphere: Sphere);
    fn update_sphere(&mut self, id: &str, update: SphereUpdate);
    /// Removes the sphere and cascades to its goals
    fn delete_sphere(&mut self, id: &str);

    fn add_goal(&mut self, goal: Goal);
    fn update_goal(&mut self, id: &str, update: GoalUpdate);
    fn delete_goal(&mut self, id: &str);
    /// Moves the goal to `archived`; local-only, never driven by sync
    fn archive_goal(&mut self, id: &str);

    fn add_subtask(&mut self, goal_id: &str, subtask: Subtask);
    fn update_subtask(&mut self, goal_id: &str, subtask_id: &str, update: SubtaskUpdate);
    fn delete_subtask(&mut self, goal_id: &str, subtask_id: &str);
    /// Reassigns order indices to match the given ID sequence; unknown IDs
    /// are dropped
    fn reorder_subtasks(&mut self, goal_id: &str, subtask_ids: &[String]);
    fn toggle_strict_order(&mut self, goal_id: &str);
}

/// In-memory store
#[derive(Debug, Default)]
pub struct MemoryStore {
    spheres: Vec<Sphere>,
    goals: Vec<Goal>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn goal_mut(&mut self, id: &str) -> Option<&mut Goal> {
        self.goals.iter_mut().find(|g| g.id == id)
    }
}

fn apply_goal_update(goal: &mut Goal, update: GoalUpdate) {
    if let Some(title) = update.title {
        goal.title = title;
    }
    if let Some(description) = update.description {
        goal.description = description;
    }
    if let Some(status) = update.status {
        goal.status = status;
        // Completed goals are always at 100%
        if status == GoalStatus::Completed {
            goal.progress = 100;
        }
    }
    if let Some(progress) = update.progress {
        goal.progress = progress.min(100);
    }
    if let Some(subtasks) = update.subtasks {
        goal.subtasks = subtasks;
    }
    if let Some(strict) = update.strict_order {
        goal.strict_order = strict;
    }
    if let Some(remote_id) = update.remote_id {
        goal.remote_id = Some(remote_id);
    }
    goal.updated_at = Utc::now();
}

impl LocalStore for MemoryStore {
    fn spheres(&self) -> Vec<Sphere> {
        self.spheres.clone()
    }

    fn goals(&self) -> Vec<Goal> {
        self.goals.clone()
    }

    fn add_sphere(&mut self, sphere: Sphere) {
        self.spheres.push(sphere);
    }

    fn update_sphere(&mut self, id: &str, update: SphereUpdate) {
        if let Some(sphere) = self.spheres.iter_mut().find(|s| s.id == id) {
            if let Some(name) = update.name {
                sphere.name = name;
            }
            if let Some(description) = update.description {
                sphere.description = description;
            }
            if let Some(color) = update.color {
                sphere.color = color;
            }
            if let Some(icon) = update.icon {
                sphere.icon = icon;
            }
            if let Some(order) = update.order {
                sphere.order = order;
            }
            if let Some(remote_id) = update.remote_id {
                sphere.remote_id = Some(remote_id);
            }
        }
    }

    fn delete_sphere(&mut self, id: &str) {
        self.spheres.retain(|s| s.id != id);
        self.goals.retain(|g| g.sphere_id != id);
    }

    fn add_goal(&mut self, goal: Goal) {
        self.goals.push(goal);
    }

    fn update_goal(&mut self, id: &str, update: GoalUpdate) {
        if let Some(goal) = self.goal_mut(id) {
            apply_goal_update(goal, update);
        }
    }

    fn delete_goal(&mut self, id: &str) {
        self.goals.retain(|g| g.id != id);
    }

    fn archive_goal(&mut self, id: &str) {
        if let Some(goal) = self.goal_mut(id) {
            goal.status = GoalStatus::Archived;
            goal.updated_at = Utc::now();
        }
    }

    fn add_subtask(&mut self, goal_id: &str, subtask: Subtask) {
        if let Some(goal) = self.goal_mut(goal_id) {
            goal.subtasks.push(subtask);
            goal.updated_at = Utc::now();
        }
    }

    fn update_subtask(&mut self, goal_id: &str, subtask_id: &str, update: SubtaskUpdate) {
        if let Some(goal) = self.goal_mut(goal_id) {
            if let Some(sub) = goal.subtasks.iter_mut().find(|s| s.id == subtask_id) {
                if let Some(title) = update.title {
                    sub.title = title;
                }
                if let Some(completed) = update.completed {
                    sub.completed = completed;
                }
                if let Some(remote_id) = update.remote_id {
                    sub.remote_id = Some(remote_id);
                }
                goal.updated_at = Utc::now();
            }
        }
    }

    fn delete_subtask(&mut self, goal_id: &str, subtask_id: &str) {
        if let Some(goal) = self.goal_mut(goal_id) {
            goal.subtasks.retain(|s| s.id != subtask_id);
            goal.updated_at = Utc::now();
        }
    }

    fn reorder_subtasks(&mut self, goal_id: &str, subtask_ids: &[String]) {
        if let Some(goal) = self.goal_mut(goal_id) {
            let mut reordered = Vec::with_capacity(subtask_ids.len());
            for (index, id) in subtask_ids.iter().enumerate() {
                if let Some(mut sub) = goal.subtasks.iter().find(|s| &s.id == id).cloned() {
                    sub.order = index as u32;
                    reordered.push(sub);
                }
            }
            goal.subtasks = reordered;
            goal.updated_at = Utc::now();
        }
    }

    fn toggle_strict_order(&mut self, goal_id: &str) {
        if let Some(goal) = self.goal_mut(goal_id) {
            goal.strict_order = !goal.strict_order;
            goal.updated_at = Utc::now();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::new_id;

    fn sphere(id: &str, name: &str) -> Sphere {
        Sphere {
            id: id.into(),
            user_id: "u1".into(),
            name: name.into(),
            description: None,
            color: "#0ea5e9".into(),
            icon: "🎯".into(),
            order: 0,
            created_at: Utc::now(),
            remote_id: None,
        }
    }

    fn goal(id: &str, sphere_id: &str, title: &str) -> Goal {
        Goal {
            id: id.into(),
            user_id: "u1".into(),
            sphere_id: sphere_id.into(),
            title: title.into(),
            description: None,
            status: GoalStatus::Active,
            progress: 0,
            subtasks: Vec::new(),
            strict_order: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            remote_id: None,
        }
    }

    #[test]
    fn test_delete_sphere_cascades_goals() {
        let mut store = MemoryStore::new();
        store.add_sphere(sphere("s1", "health"));
        store.add_goal(goal("g1", "s1", "run 5k"));
        store.add_goal(goal("g2", "s2", "other"));

        store.delete_sphere("s1");

        assert!(store.spheres().is_empty());
        assert_eq!(store.goals().len(), 1);
        assert_eq!(store.goals()[0].id, "g2");
    }

    #[test]
    fn test_completed_status_forces_full_progress() {
        let mut store = MemoryStore::new();
        store.add_goal(goal("g1", "s1", "run 5k"));

        store.update_goal(
            "g1",
            GoalUpdate {
                status: Some(GoalStatus::Completed),
                ..Default::default()
            },
        );

        let g = &store.goals()[0];
        assert_eq!(g.status, GoalStatus::Completed);
        assert_eq!(g.progress, 100);
    }

    #[test]
    fn test_reorder_subtasks_reassigns_indices() {
        let mut store = MemoryStore::new();
        store.add_goal(goal("g1", "s1", "run 5k"));
        for title in ["a", "b", "c"] {
            store.add_subtask(
                "g1",
                Subtask {
                    id: format!("sub-{title}"),
                    title: title.into(),
                    completed: false,
                    order: 0,
                    remote_id: None,
                },
            );
        }

        store.reorder_subtasks(
            "g1",
            &["sub-c".into(), "sub-a".into(), "sub-b".into()],
        );

        let subs = &store.goals()[0].subtasks;
        assert_eq!(subs[0].id, "sub-c");
        assert_eq!(subs[0].order, 0);
        assert_eq!(subs[2].id, "sub-b");
        assert_eq!(subs[2].order, 2);
    }

    #[test]
    fn test_update_subtask_links_remote_id() {
        let mut store = MemoryStore::new();
        store.add_goal(goal("g1", "s1", "run 5k"));
        let sub_id = new_id("sub");
        store.add_subtask(
            "g1",
            Subtask {
                id: sub_id.clone(),
                title: "warm up".into(),
                completed: false,
                order: 0,
                remote_id: None,
            },
        );

        store.update_subtask(
            "g1",
            &sub_id,
            SubtaskUpdate {
                remote_id: Some("rt-1".into()),
                ..Default::default()
            },
        );

        assert_eq!(
            store.goals()[0].subtasks[0].remote_id.as_deref(),
            Some("rt-1")
        );
    }
}
