//! Daily-task push: one-way projection of a day's generated tasks
//!
//! The data here is disposable and regenerated every day, so this path has
//! weaker guarantees than the batch syncs: the target project is located
//! but never created, and any failure aborts the rest silently.

use chrono::NaiveDate;
use tracing::debug;

use crate::client::TaskManager;
use crate::error::Result;
use crate::model::DailyTask;
use crate::sync::SyncEngine;
use crate::types::NewTask;

impl<C: TaskManager> SyncEngine<C> {
    /// Push one parent task for the day plus one child per daily task into
    /// the fixed daily project. Fire-and-forget: if the project is absent
    /// or anything fails, the push stops without reporting.
    pub async fn push_daily_tasks(&self, tasks: &[DailyTask], date: NaiveDate) {
        if !self.client().is_configured() {
            return;
        }
        if let Err(err) = self.push_daily_inner(tasks, date).await {
            debug!(error = %err, "daily task push failed");
        }
    }

    async fn push_daily_inner(&self, tasks: &[DailyTask], date: NaiveDate) -> Result<()> {
        let projects = self.client().list_projects().await?;
        let daily_name = &self.config().daily_project_name;
        let Some(project) = projects.iter().find(|p| &p.name == daily_name) else {
            debug!("daily project absent; skipping push");
            return Ok(());
        };

        let parent = self
            .client()
            .create_task(NewTask {
                content: format!("seeker: {}", date.format("%-d %b")),
                project_id: project.id.clone(),
                due_hint: Some("today".to_string()),
                ..Default::default()
            })
            .await?;

        for task in tasks {
            self.client()
                .create_task(NewTask {
                    content: task.title.clone(),
                    description: Some(task.description.clone()),
                    project_id: project.id.clone(),
                    parent_id: Some(parent.id.clone()),
                    labels: vec![task.difficulty.label().to_string()],
                    ..Default::default()
                })
                .await?;
        }

        Ok(())
    }
}
