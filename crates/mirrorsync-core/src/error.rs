//! Error types for synchronization.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while mirroring a tree.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Permission denied for a path.
    #[error("Permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    /// Path not found.
    #[error("Path not found: {path}")]
    NotFound { path: PathBuf },

    /// Generic I/O error.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Directory listing failed.
    #[error("Failed to list {path}: {message}")]
    Walk { path: PathBuf, message: String },

    /// Path is expected to be a directory.
    #[error("Not a directory: {path}")]
    NotADirectory { path: PathBuf },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// A background sync task panicked or was cancelled.
    #[error("Sync task failed: {message}")]
    TaskFailed { message: String },
}

impl SyncError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            std::io::ErrorKind::NotFound => Self::NotFound { path },
            _ => Self::Io { path, source },
        }
    }
}

/// A directory level whose reconciliation was abandoned.
///
/// The remaining passes of that level, and every child level not yet
/// visited, were skipped for the tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelFailure {
    /// Source side of the directory pair.
    pub source: PathBuf,
    /// Replica side of the directory pair.
    pub replica: PathBuf,
    /// Human-readable cause.
    pub message: String,
}

impl LevelFailure {
    /// Record a failure for a directory pair.
    pub fn new(source: impl Into<PathBuf>, replica: impl Into<PathBuf>, error: &SyncError) -> Self {
        Self {
            source: source.into(),
            replica: replica.into(),
            message: error.to_string(),
        }
    }
}

impl std::fmt::Display for LevelFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}: {}", self.source.display(), self.replica.display(), self.message)
    }
}
