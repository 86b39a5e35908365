//! Error taxonomy for task tree operations.

use crate::types::TaskId;
use thiserror::Error;

/// Errors surfaced by the storage and tree layers.
///
/// The first three variants are user-recoverable: the operation was rejected
/// before any write, so storage is exactly as it was. The remaining variants
/// are storage failures, fatal for the current operation only.
#[derive(Debug, Error)]
pub enum Error {
    /// Rejected input: empty name, malformed date text, unknown parent.
    #[error("{0}")]
    Validation(String),

    /// Operation referenced an id that no longer exists (stale view).
    #[error("task not found: #{0}")]
    NotFound(TaskId),

    /// Reparent or reorder would make a task its own ancestor.
    #[error("moving task #{task} under task #{target} would create a cycle")]
    Cycle { task: TaskId, target: TaskId },

    #[error(transparent)]
    Database(#[from] rusqlite::Error),

    #[error(transparent)]
    Migration(#[from] refinery::Error),
}

impl Error {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn cycle(task: TaskId, target: TaskId) -> Self {
        Self::Cycle { task, target }
    }

    /// True for errors the caller should report to the user and move on from.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::NotFound(_) | Self::Cycle { .. }
        )
    }
}

/// Result type for task tree operations.
pub type Result<T> = std::result::Result<T, Error>;
