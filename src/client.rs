//! HTTP client for the remote hierarchical task manager
//!
//! # Example
//!
//! ```rust,no_run
//! use seeker_sync::{ClientConfig, TodoistClient, TaskManager};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = TodoistClient::new(ClientConfig {
//!     api_token: Some("tok".into()),
//!     ..Default::default()
//! });
//!
//! for project in client.list_projects().await? {
//!     println!("{} ({})", project.name, project.id);
//! }
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use reqwest::{header, Client};
use std::time::Duration;

use crate::error::{Result, SyncError};
use crate::types::*;

/// The remote task-manager surface consumed by the sync engine.
///
/// List operations hide pagination: implementations return the full
/// collection. The HTTP implementation loops cursor pages; the test fake
/// returns its in-memory state directly.
#[async_trait]
pub trait TaskManager: Send + Sync {
    /// All projects across every page
    async fn list_projects(&self) -> Result<Vec<RemoteProject>>;
    async fn create_project(&self, project: NewProject) -> Result<RemoteProject>;
    /// All tasks in one project across every page.
    ///
    /// The remote lists only active (not completed) tasks; completion of
    /// previously-seen tasks must be inferred from absence.
    async fn list_tasks(&self, project_id: &str) -> Result<Vec<RemoteTask>>;
    async fn create_task(&self, task: NewTask) -> Result<RemoteTask>;
    async fn update_task(&self, task_id: &str, update: TaskUpdate) -> Result<RemoteTask>;
    async fn complete_task(&self, task_id: &str) -> Result<()>;
    async fn reopen_task(&self, task_id: &str) -> Result<()>;
    /// True iff a credential is present; gates every sync entry point
    fn is_configured(&self) -> bool;
}

/// HTTP client for a Todoist-shaped task manager API
pub struct TodoistClient {
    config: ClientConfig,
    client: Client,
}

impl TodoistClient {
    /// Create a new client from an injected configuration
    pub fn new(config: ClientConfig) -> Self {
        let mut headers = header::HeaderMap::new();
        if let Some(ref token) = config.api_token {
            if let Ok(value) = header::HeaderValue::from_str(&format!("Bearer {}", token)) {
                headers.insert(header::AUTHORIZATION, value);
            }
        }

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .expect("failed to build HTTP client");

        Self { config, client }
    }

    fn require_token(&self) -> Result<()> {
        match self.config.api_token {
            Some(ref token) if !token.is_empty() => Ok(()),
            _ => Err(SyncError::NotConfigured),
        }
    }

    /// Fetch every page of a cursor-paginated listing
    async fn paginate<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<Vec<T>> {
        self.require_token()?;

        let mut all = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let url = format!("{}{}", self.config.base_url, path);
            let mut request = self.client.get(&url).query(query);
            if let Some(ref c) = cursor {
                request = request.query(&[("cursor", c.as_str())]);
            }

            let page: Page<T> = handle_response(request.send().await?).await?;
            all.extend(page.results);

            match page.next_cursor {
                Some(c) if !c.is_empty() => cursor = Some(c),
                _ => break,
            }
        }

        Ok(all)
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: serde::Serialize + ?Sized,
        T: serde::de::DeserializeOwned,
    {
        self.require_token()?;

        let url = format!("{}{}", self.config.base_url, path);
        let response = self
            .client
            .post(&url)
            .header(header::CONTENT_TYPE, "application/json")
            .json(body)
            .send()
            .await?;

        handle_response(response).await
    }

    /// POST with no response body expected (completion/reopen endpoints)
    async fn post_empty(&self, path: &str) -> Result<()> {
        self.require_token()?;

        let url = format!("{}{}", self.config.base_url, path);
        let response = self.client.post(&url).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(SyncError::Server { status, message });
        }
        Ok(())
    }
}

#[async_trait]
impl TaskManager for TodoistClient {
    async fn list_projects(&self) -> Result<Vec<RemoteProject>> {
        self.paginate("/projects", &[]).await
    }

    async fn create_project(&self, project: NewProject) -> Result<RemoteProject> {
        self.post("/projects", &project).await
    }

    async fn list_tasks(&self, project_id: &str) -> Result<Vec<RemoteTask>> {
        self.paginate("/tasks", &[("project_id", project_id)]).await
    }

    async fn create_task(&self, task: NewTask) -> Result<RemoteTask> {
        self.post("/tasks", &task).await
    }

    async fn update_task(&self, task_id: &str, update: TaskUpdate) -> Result<RemoteTask> {
        let path = format!("/tasks/{}", urlencoding::encode(task_id));
        self.post(&path, &update).await
    }

    async fn complete_task(&self, task_id: &str) -> Result<()> {
        let path = format!("/tasks/{}/close", urlencoding::encode(task_id));
        self.post_empty(&path).await
    }

    async fn reopen_task(&self, task_id: &str) -> Result<()> {
        let path = format!("/tasks/{}/reopen", urlencoding::encode(task_id));
        self.post_empty(&path).await
    }

    fn is_configured(&self) -> bool {
        matches!(self.config.api_token, Some(ref t) if !t.is_empty())
    }
}

async fn handle_response<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T> {
    if !response.status().is_success() {
        let status = response.status().as_u16();
        let message = response.text().await.unwrap_or_default();
        return Err(SyncError::Server { status, message });
    }

    Ok(response.json().await?)
}
