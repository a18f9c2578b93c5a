//! Error types for the notification service

use thiserror::Error;

/// Main error type for all notification operations
#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Receipt rendering failed: {0}")]
    Render(String),

    #[error("Workflow error: {0}")]
    Workflow(String),
}

/// Result type for notification operations
pub type Result<T> = std::result::Result<T, NotifyError>;
