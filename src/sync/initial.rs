//! Initial sync: push local scaffolding to the remote task manager
//!
//! Creation-or-adoption only: every sphere, active goal, and subtask is
//! resolved remotely by `remote_id` first, then by exact name within its
//! structural scope, and created only when neither matches. Repeating the
//! run with no external changes therefore creates nothing new.

use tracing::{info, warn};

use crate::client::TaskManager;
use crate::error::Result;
use crate::model::{Goal, GoalStatus, GoalUpdate, Sphere, SphereUpdate, SubtaskUpdate};
use crate::store::LocalStore;
use crate::sync::{SyncEngine, SyncReport};
use crate::types::{NewProject, NewTask, RemoteProject, RemoteTask};

impl<C: TaskManager> SyncEngine<C> {
    /// Push the local sphere/goal hierarchy into the remote task manager,
    /// creating the root project, one project per sphere, one top-level
    /// task per active goal, and one child task per subtask.
    ///
    /// A failure on one sphere, goal, or subtask is recorded in the report
    /// and does not affect its siblings. Only a failure listing projects
    /// (or ensuring the root) aborts the whole run.
    pub async fn initial_sync(&self, store: &mut dyn LocalStore) -> SyncReport {
        let mut report = SyncReport::default();
        if !self.client().is_configured() {
            return report;
        }

        let projects = match self.client().list_projects().await {
            Ok(projects) => projects,
            Err(err) => {
                report.errors.push(format!("sync failed: {err}"));
                return report;
            }
        };

        let root_id = match self.ensure_root_project(&projects).await {
            Ok(id) => id,
            Err(err) => {
                report.errors.push(format!("sync failed: {err}"));
                return report;
            }
        };

        let spheres = store.spheres();
        let goals = store.goals();
        for sphere in &spheres {
            if let Err(err) = self
                .scaffold_sphere(sphere, &goals, &projects, &root_id, store, &mut report)
                .await
            {
                warn!(sphere = %sphere.name, error = %err, "sphere scaffolding failed");
                report.errors.push(format!("sphere \"{}\": {}", sphere.name, err));
            }
        }

        info!(
            spheres_created = report.spheres_created,
            goals_created = report.goals_created,
            subtasks_created = report.subtasks_created,
            errors = report.errors.len(),
            "initial sync finished"
        );
        report
    }

    /// Root project: find by fixed name with no parent, else create
    async fn ensure_root_project(&self, projects: &[RemoteProject]) -> Result<String> {
        let root_name = &self.config().root_project_name;
        if let Some(root) = projects
            .iter()
            .find(|p| &p.name == root_name && p.parent_id.is_none())
        {
            return Ok(root.id.clone());
        }

        let created = self
            .client()
            .create_project(NewProject {
                name: root_name.clone(),
                parent_id: None,
                color: Some("blue".to_string()),
            })
            .await?;
        info!(project_id = %created.id, "created root project");
        Ok(created.id)
    }

    async fn scaffold_sphere(
        &self,
        sphere: &Sphere,
        goals: &[Goal],
        projects: &[RemoteProject],
        root_id: &str,
        store: &mut dyn LocalStore,
        report: &mut SyncReport,
    ) -> Result<()> {
        // Join by remote_id first; fall back to name-under-root only for
        // never-linked spheres
        let existing = match sphere.remote_id {
            Some(ref remote_id) => projects.iter().find(|p| &p.id == remote_id),
            None => projects
                .iter()
                .find(|p| p.name == sphere.name && p.parent_id.as_deref() == Some(root_id)),
        };

        let project = match existing {
            Some(project) => project.clone(),
            None => {
                let created = self
                    .client()
                    .create_project(NewProject {
                        name: sphere.name.clone(),
                        parent_id: Some(root_id.to_string()),
                        color: None,
                    })
                    .await?;
                report.spheres_created += 1;
                created
            }
        };

        if sphere.remote_id.as_deref() != Some(&project.id) {
            store.update_sphere(
                &sphere.id,
                SphereUpdate {
                    remote_id: Some(project.id.clone()),
                    ..Default::default()
                },
            );
        }

        // One fetch per sphere; goal and subtask matching both work off it
        let existing_tasks = self.client().list_tasks(&project.id).await?;

        let sphere_goals = goals
            .iter()
            .filter(|g| g.sphere_id == sphere.id && g.status != GoalStatus::Archived);
        for goal in sphere_goals {
            if let Err(err) = self
                .scaffold_goal(goal, &project.id, &existing_tasks, store, report)
                .await
            {
                warn!(goal = %goal.title, error = %err, "goal scaffolding failed");
                report.errors.push(format!("goal \"{}\": {}", goal.title, err));
            }
        }

        Ok(())
    }

    async fn scaffold_goal(
        &self,
        goal: &Goal,
        project_id: &str,
        existing_tasks: &[RemoteTask],
        store: &mut dyn LocalStore,
        report: &mut SyncReport,
    ) -> Result<()> {
        let existing = match goal.remote_id {
            Some(ref remote_id) => existing_tasks.iter().find(|t| &t.id == remote_id),
            None => existing_tasks
                .iter()
                .find(|t| t.content == goal.title && t.parent_id.is_none()),
        };

        let goal_task = match existing {
            Some(task) => task.clone(),
            None => {
                let created = self
                    .client()
                    .create_task(NewTask {
                        content: goal.title.clone(),
                        description: Some(goal.description.clone().unwrap_or_default()),
                        project_id: project_id.to_string(),
                        ..Default::default()
                    })
                    .await?;
                report.goals_created += 1;
                created
            }
        };

        if goal.remote_id.as_deref() != Some(&goal_task.id) {
            store.update_goal(
                &goal.id,
                GoalUpdate {
                    remote_id: Some(goal_task.id.clone()),
                    ..Default::default()
                },
            );
        }

        for subtask in &goal.subtasks {
            let existing = match subtask.remote_id {
                Some(ref remote_id) => existing_tasks.iter().find(|t| &t.id == remote_id),
                None => existing_tasks.iter().find(|t| {
                    t.content == subtask.title && t.parent_id.as_deref() == Some(&goal_task.id)
                }),
            };

            let result = match existing {
                Some(task) => Ok(task.clone()),
                None => {
                    self.client()
                        .create_task(NewTask {
                            content: subtask.title.clone(),
                            project_id: project_id.to_string(),
                            parent_id: Some(goal_task.id.clone()),
                            ..Default::default()
                        })
                        .await
                }
            };

            match result {
                Ok(remote) => {
                    if existing.is_none() {
                        report.subtasks_created += 1;
                    }
                    // Link just this subtask entry, not the whole list
                    if subtask.remote_id.as_deref() != Some(&remote.id) {
                        store.update_subtask(
                            &goal.id,
                            &subtask.id,
                            SubtaskUpdate {
                                remote_id: Some(remote.id),
                                ..Default::default()
                            },
                        );
                    }
                }
                Err(err) => {
                    warn!(subtask = %subtask.title, error = %err, "subtask scaffolding failed");
                    report
                        .errors
                        .push(format!("subtask \"{}\": {}", subtask.title, err));
                }
            }
        }

        Ok(())
    }
}
