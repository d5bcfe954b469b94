//! Single-entity best-effort push helpers
//!
//! Invoked by direct UI actions, not by the batch syncs. Each one mirrors
//! a single local change to the remote side when the involved entities are
//! already linked, and otherwise does nothing. Failures never reach the
//! caller: these are "mirror if convenient" operations, not transactions.

use tracing::debug;

use crate::client::TaskManager;
use crate::model::{Goal, Sphere, Subtask};
use crate::sync::SyncEngine;
use crate::types::{NewTask, TaskUpdate};

impl<C: TaskManager> SyncEngine<C> {
    /// Create the remote task for a new goal. Requires a linked sphere.
    /// Returns the new remote ID for the caller to persist, or `None` when
    /// the sphere is unlinked or the call failed.
    pub async fn push_goal_create(&self, goal: &Goal, sphere: &Sphere) -> Option<String> {
        let project_id = sphere.remote_id.as_ref()?;

        match self
            .client()
            .create_task(NewTask {
                content: goal.title.clone(),
                description: Some(goal.description.clone().unwrap_or_default()),
                project_id: project_id.clone(),
                ..Default::default()
            })
            .await
        {
            Ok(task) => Some(task.id),
            Err(err) => {
                debug!(goal = %goal.title, error = %err, "goal create push failed");
                None
            }
        }
    }

    /// Mirror title/description changes of a linked goal
    pub async fn push_goal_update(&self, goal: &Goal) {
        let Some(ref task_id) = goal.remote_id else {
            return;
        };

        if let Err(err) = self
            .client()
            .update_task(
                task_id,
                TaskUpdate {
                    content: Some(goal.title.clone()),
                    description: goal.description.clone(),
                    ..Default::default()
                },
            )
            .await
        {
            debug!(goal = %goal.title, error = %err, "goal update push failed");
        }
    }

    /// Close the remote task of a linked goal
    pub async fn push_goal_complete(&self, goal: &Goal) {
        let Some(ref task_id) = goal.remote_id else {
            return;
        };
        if let Err(err) = self.client().complete_task(task_id).await {
            debug!(goal = %goal.title, error = %err, "goal complete push failed");
        }
    }

    /// Reopen the remote task of a linked goal (restore from completed)
    pub async fn push_goal_reopen(&self, goal: &Goal) {
        let Some(ref task_id) = goal.remote_id else {
            return;
        };
        if let Err(err) = self.client().reopen_task(task_id).await {
            debug!(goal = %goal.title, error = %err, "goal reopen push failed");
        }
    }

    /// Create the remote child task for a new subtask. Requires both the
    /// goal and its sphere to be linked. Returns the new remote ID, or
    /// `None` when unlinked or failed.
    pub async fn push_subtask_create(
        &self,
        subtask: &Subtask,
        goal: &Goal,
        sphere: &Sphere,
    ) -> Option<String> {
        let project_id = sphere.remote_id.as_ref()?;
        let parent_id = goal.remote_id.as_ref()?;

        match self
            .client()
            .create_task(NewTask {
                content: subtask.title.clone(),
                project_id: project_id.clone(),
                parent_id: Some(parent_id.clone()),
                ..Default::default()
            })
            .await
        {
            Ok(task) => Some(task.id),
            Err(err) => {
                debug!(subtask = %subtask.title, error = %err, "subtask create push failed");
                None
            }
        }
    }

    /// Mirror a title change of a linked subtask
    pub async fn push_subtask_update(&self, subtask: &Subtask) {
        let Some(ref task_id) = subtask.remote_id else {
            return;
        };
        if let Err(err) = self
            .client()
            .update_task(
                task_id,
                TaskUpdate {
                    content: Some(subtask.title.clone()),
                    ..Default::default()
                },
            )
            .await
        {
            debug!(subtask = %subtask.title, error = %err, "subtask update push failed");
        }
    }

    /// Close the remote task of a linked subtask
    pub async fn push_subtask_complete(&self, subtask: &Subtask) {
        let Some(ref task_id) = subtask.remote_id else {
            return;
        };
        if let Err(err) = self.client().complete_task(task_id).await {
            debug!(subtask = %subtask.title, error = %err, "subtask complete push failed");
        }
    }

    /// Reopen the remote task of a linked subtask (un-complete)
    pub async fn push_subtask_reopen(&self, subtask: &Subtask) {
        let Some(ref task_id) = subtask.remote_id else {
            return;
        };
        if let Err(err) = self.client().reopen_task(task_id).await {
            debug!(subtask = %subtask.title, error = %err, "subtask reopen push failed");
        }
    }
}
