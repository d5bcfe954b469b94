//! Client configuration and wire types for the remote task manager

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Task-manager client configuration
///
/// Constructed once and injected into the client; there is no ambient
/// credential lookup.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the task-manager HTTP API
    pub base_url: String,
    /// API token; `None` leaves the whole sync subsystem inert
    pub api_token: Option<String>,
    /// Request timeout in seconds (default: 30)
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.todoist.com/api/v1".to_string(),
            api_token: None,
            timeout_secs: 30,
        }
    }
}

/// A remote project (maps to a local sphere, or the fixed root)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteProject {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub child_order: i32,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub is_archived: bool,
    #[serde(default)]
    pub is_deleted: bool,
}

/// A remote task (maps to a local goal or subtask)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteTask {
    pub id: String,
    /// Task title
    pub content: String,
    #[serde(default)]
    pub description: String,
    pub project_id: String,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub child_order: i32,
    #[serde(default)]
    pub is_completed: bool,
    #[serde(default)]
    pub labels: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One page of a cursor-paginated list response
#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    pub results: Vec<T>,
    #[serde(default)]
    pub next_cursor: Option<String>,
}

/// Request body for creating a project
#[derive(Debug, Clone, Default, Serialize)]
pub struct NewProject {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Request body for creating a task
#[derive(Debug, Clone, Default, Serialize)]
pub struct NewTask {
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub project_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,
    /// Natural-language due hint, e.g. `"today"`
    #[serde(rename = "due_string", skip_serializing_if = "Option::is_none")]
    pub due_hint: Option<String>,
}

/// Sparse update body for a task; absent fields are left untouched remotely
#[derive(Debug, Clone, Default, Serialize)]
pub struct TaskUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<String>>,
}
