//! Error types for frontline.

use thiserror::Error;

/// Errors surfaced by the frontline library and CLI.
#[derive(Debug, Error)]
pub enum FrontlineError {
    /// `SQLite` open, migration, or query failure.
    #[error("database error: {0}")]
    Database(String),

    /// Invalid or unreadable configuration, or a bad command-line value.
    #[error("configuration error: {0}")]
    Config(String),

    /// Filesystem or terminal I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encode/decode failure.
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A requested record does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The remote backend rejected or could not receive a call.
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// Session restore or role validation failure.
    #[error("auth error: {0}")]
    Auth(String),
}

/// Rejections produced by a remote backend call.
///
/// Network, authorization and validation failures all land here; the sync
/// core treats every variant the same way (queue on immediate failure, halt
/// on drain failure).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BackendError {
    /// The request never reached the backend or the connection dropped.
    #[error("network error: {0}")]
    Network(String),

    /// The backend answered with a non-success status.
    #[error("backend rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// The queued payload does not match the shape its action type expects.
    #[error("invalid payload for {action}: {reason}")]
    InvalidPayload { action: String, reason: String },

    /// No backend address is configured.
    #[error("no remote backend configured")]
    NotConfigured,
}

impl BackendError {
    /// Build a rejection from an HTTP status and response body.
    #[must_use]
    pub fn rejected(status: u16, message: impl Into<String>) -> Self {
        Self::Rejected {
            status,
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for BackendError {
    fn from(e: reqwest::Error) -> Self {
        match e.status() {
            Some(status) => Self::rejected(status.as_u16(), e.to_string()),
            None => Self::Network(e.to_string()),
        }
    }
}

impl From<rusqlite::Error> for FrontlineError {
    fn from(e: rusqlite::Error) -> Self {
        Self::Database(e.to_string())
    }
}

impl From<serde_yaml::Error> for FrontlineError {
    fn from(e: serde_yaml::Error) -> Self {
        Self::Config(e.to_string())
    }
}
