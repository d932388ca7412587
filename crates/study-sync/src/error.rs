//! Sync Errors
//!
//! Failure taxonomy shared by the stores, the list controller and the
//! session gate. Errors carry only a human-readable message.

use thiserror::Error;

/// Common result type for sync operations
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors surfaced by the sync layer
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncError {
    /// Network unreachable, non-success status or undecodable body
    #[error("{message}")]
    Transport { message: String },

    /// Rejected on the client before any request was issued
    #[error("{0}")]
    Validation(String),

    /// No authenticated user in this browser context
    #[error("Please sign in to continue")]
    SessionMissing,

    /// The targeted entity is not in the local list
    #[error("No entry with id {id}")]
    NotFound { id: String },

    /// The owning controller was dropped while the operation waited its turn
    #[error("The list was closed before the change could be sent")]
    Disposed,
}

impl SyncError {
    pub fn transport(message: impl Into<String>) -> Self {
        SyncError::Transport { message: message.into() }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        SyncError::Validation(message.into())
    }

    pub fn not_found(id: impl Into<String>) -> Self {
        SyncError::NotFound { id: id.into() }
    }
}

impl From<reqwest::Error> for SyncError {
    fn from(err: reqwest::Error) -> Self {
        SyncError::transport(err.to_string())
    }
}
