//! Pull sync: fold remote changes back into local state
//!
//! Walks every project under the fixed root, adopting unknown projects as
//! spheres, updating linked goals, and inferring completion from absence:
//! the remote lists only active tasks, so a linked entity that stops
//! appearing is treated as completed. Deleted-remotely cannot be told apart
//! from completed-remotely; the engine biases toward "completed" so nothing
//! is silently lost, and actual deletions must be archived manually.

use std::collections::HashSet;

use chrono::Utc;
use tracing::{debug, info};

use crate::client::TaskManager;
use crate::error::Result;
use crate::model::{new_id, Goal, GoalStatus, GoalUpdate, Sphere, SphereUpdate, Subtask};
use crate::store::LocalStore;
use crate::sync::{SyncEngine, SyncReport};
use crate::types::RemoteTask;

/// Round-robin palette for spheres discovered remotely, indexed by the
/// number of spheres created so far in the run — deterministic within a
/// batch so adoption order fully decides appearance.
const SPHERE_COLORS: [&str; 8] = [
    "#ef4444", "#f97316", "#eab308", "#22c55e", "#0ea5e9", "#6366f1", "#a855f7", "#ec4899",
];
const SPHERE_ICONS: [&str; 8] = ["🎯", "💼", "❤️", "🧠", "💰", "🏋️", "🎨", "🌱"];

/// Knobs for one pull run
#[derive(Debug, Clone)]
pub struct PullOptions {
    /// Materialize remote projects with no local counterpart as new
    /// spheres; when false they are skipped entirely
    pub adopt_spheres: bool,
}

impl Default for PullOptions {
    fn default() -> Self {
        Self {
            adopt_spheres: true,
        }
    }
}

impl<C: TaskManager> SyncEngine<C> {
    /// Reconcile local state against the remote tree under the root
    /// project.
    ///
    /// Returns an empty report when the root project does not exist. Any
    /// error aborts the rest of the run with a single report entry; local
    /// mutations already applied are kept.
    pub async fn pull_sync(&self, store: &mut dyn LocalStore, options: PullOptions) -> SyncReport {
        let mut report = SyncReport::default();
        if !self.client().is_configured() {
            return report;
        }

        if let Err(err) = self.pull_all(store, &options, &mut report).await {
            report.errors.push(format!("pull sync failed: {err}"));
        }

        info!(
            spheres_created = report.spheres_created,
            spheres_updated = report.spheres_updated,
            goals_created = report.goals_created,
            goals_updated = report.goals_updated,
            subtasks_created = report.subtasks_created,
            subtasks_updated = report.subtasks_updated,
            errors = report.errors.len(),
            "pull sync finished"
        );
        report
    }

    async fn pull_all(
        &self,
        store: &mut dyn LocalStore,
        options: &PullOptions,
        report: &mut SyncReport,
    ) -> Result<()> {
        let projects = self.client().list_projects().await?;
        let root_name = &self.config().root_project_name;
        let Some(root) = projects
            .iter()
            .find(|p| &p.name == root_name && p.parent_id.is_none())
        else {
            // No root project means nothing was ever pushed
            debug!("root project absent; nothing to pull");
            return Ok(());
        };

        let sphere_projects = projects.iter().filter(|p| {
            p.parent_id.as_deref() == Some(&root.id) && !p.is_archived && !p.is_deleted
        });

        // Snapshots taken once; entities synthesized during the run are
        // already linked and need no further reconciliation this batch
        let spheres = store.spheres();
        let goals = store.goals();

        for project in sphere_projects {
            let local = spheres
                .iter()
                .find(|s| s.remote_id.as_deref() == Some(&project.id))
                .or_else(|| spheres.iter().find(|s| s.name == project.name));

            let sphere_id = match local {
                Some(sphere) => {
                    // Backfill the link for a name-matched sphere
                    if sphere.remote_id.is_none() {
                        store.update_sphere(
                            &sphere.id,
                            SphereUpdate {
                                remote_id: Some(project.id.clone()),
                                ..Default::default()
                            },
                        );
                    }
                    if sphere.name != project.name {
                        store.update_sphere(
                            &sphere.id,
                            SphereUpdate {
                                name: Some(project.name.clone()),
                                ..Default::default()
                            },
                        );
                        report.spheres_updated += 1;
                    }
                    sphere.id.clone()
                }
                None => {
                    if !options.adopt_spheres {
                        continue;
                    }
                    let palette = report.spheres_created as usize % SPHERE_COLORS.len();
                    let sphere = Sphere {
                        id: new_id("sphere"),
                        user_id: self.config().user_id.clone(),
                        name: project.name.clone(),
                        description: None,
                        color: SPHERE_COLORS[palette].to_string(),
                        icon: SPHERE_ICONS[palette].to_string(),
                        order: spheres.len() as u32 + report.spheres_created,
                        created_at: Utc::now(),
                        remote_id: Some(project.id.clone()),
                    };
                    let id = sphere.id.clone();
                    store.add_sphere(sphere);
                    report.spheres_created += 1;
                    id
                }
            };

            let tasks = self.client().list_tasks(&project.id).await?;
            let top_level: Vec<&RemoteTask> =
                tasks.iter().filter(|t| t.parent_id.is_none()).collect();

            for &task in &top_level {
                match goals
                    .iter()
                    .find(|g| g.remote_id.as_deref() == Some(&task.id))
                {
                    Some(goal) => reconcile_linked_goal(goal, task, &tasks, store, report),
                    // Unseen and still active: materialize locally
                    None if !task.is_completed => {
                        let goal = goal_from_remote(
                            task,
                            &tasks,
                            &sphere_id,
                            &self.config().user_id,
                        );
                        store.add_goal(goal);
                        report.goals_created += 1;
                    }
                    // Completed-and-never-seen items are not backfilled
                    None => {}
                }
            }

            // Linked active goals missing from the listing were completed
            // (or deleted) remotely
            let sphere_goals = goals.iter().filter(|g| {
                g.sphere_id == sphere_id && g.remote_id.is_some() && g.status == GoalStatus::Active
            });
            for goal in sphere_goals {
                let still_listed = top_level
                    .iter()
                    .any(|t| Some(t.id.as_str()) == goal.remote_id.as_deref());
                if !still_listed {
                    store.update_goal(
                        &goal.id,
                        GoalUpdate {
                            status: Some(GoalStatus::Completed),
                            progress: Some(100),
                            ..Default::default()
                        },
                    );
                    report.goals_updated += 1;
                }
            }
        }

        Ok(())
    }
}

/// Stage field and subtask updates for a goal already linked to `task`,
/// applying them in one store call when anything actually changed
fn reconcile_linked_goal(
    goal: &Goal,
    task: &RemoteTask,
    tasks: &[RemoteTask],
    store: &mut dyn LocalStore,
    report: &mut SyncReport,
) {
    let mut update = GoalUpdate::default();

    if goal.title != task.content {
        update.title = Some(task.content.clone());
    }
    if !task.description.is_empty() && goal.description.as_deref() != Some(&task.description) {
        update.description = Some(Some(task.description.clone()));
    }
    if task.is_completed && goal.status == GoalStatus::Active {
        update.status = Some(GoalStatus::Completed);
        update.progress = Some(100);
        report.goals_updated += 1;
    }

    let remote_children: Vec<&RemoteTask> = tasks
        .iter()
        .filter(|t| t.parent_id.as_deref() == Some(&task.id))
        .collect();
    let present: HashSet<&str> = remote_children.iter().map(|t| t.id.as_str()).collect();

    let mut subtasks = goal.subtasks.clone();
    let mut subtasks_changed = false;

    for child in &remote_children {
        match subtasks
            .iter_mut()
            .find(|s| s.remote_id.as_deref() == Some(&child.id))
        {
            Some(existing) => {
                if existing.title != child.content {
                    existing.title = child.content.clone();
                    subtasks_changed = true;
                }
                // Listed means active: undo a local completion
                if existing.completed {
                    existing.completed = false;
                    report.subtasks_updated += 1;
                    subtasks_changed = true;
                }
            }
            None => {
                subtasks.push(Subtask {
                    id: new_id("sub"),
                    title: child.content.clone(),
                    completed: false,
                    order: subtasks.len() as u32,
                    remote_id: Some(child.id.clone()),
                });
                report.subtasks_created += 1;
                subtasks_changed = true;
            }
        }
    }

    // Linked but absent from the listing: completed remotely
    for sub in subtasks.iter_mut() {
        let vanished = matches!(sub.remote_id.as_deref(), Some(id) if !present.contains(id));
        if vanished && !sub.completed {
            sub.completed = true;
            report.subtasks_updated += 1;
            subtasks_changed = true;
        }
    }

    if subtasks_changed {
        update.subtasks = Some(subtasks);
    }
    if !update.is_empty() {
        store.update_goal(&goal.id, update);
    }
}

/// Materialize a never-seen active remote task as a local goal, mirroring
/// its children 1:1
fn goal_from_remote(task: &RemoteTask, tasks: &[RemoteTask], sphere_id: &str, user_id: &str) -> Goal {
    let subtasks = tasks
        .iter()
        .filter(|t| t.parent_id.as_deref() == Some(&task.id))
        .enumerate()
        .map(|(index, child)| Subtask {
            id: new_id("sub"),
            title: child.content.clone(),
            completed: child.is_completed,
            order: index as u32,
            remote_id: Some(child.id.clone()),
        })
        .collect();

    Goal {
        id: new_id("goal"),
        user_id: user_id.to_string(),
        sphere_id: sphere_id.to_string(),
        title: task.content.clone(),
        description: (!task.description.is_empty()).then(|| task.description.clone()),
        status: GoalStatus::Active,
        progress: 0,
        subtasks,
        strict_order: false,
        created_at: task.created_at,
        updated_at: Utc::now(),
        remote_id: Some(task.id.clone()),
    }
}
