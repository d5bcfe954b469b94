//! Error types for the sync engine and task-manager client

use thiserror::Error;

/// Sync engine error
#[derive(Debug, Error)]
pub enum SyncError {
    /// No API token configured; the sync subsystem is inert
    #[error("task manager API token not configured")]
    NotConfigured,

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server returned a non-success status
    #[error("server error {status}: {message}")]
    Server { status: u16, message: String },

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for sync operations
pub type Result<T> = std::result::Result<T, SyncError>;
