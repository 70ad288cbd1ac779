//! Mutation events emitted while reconciling a replica.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// The kind of mutation an event describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    Copied,
    Deleted,
    CreatedFolder,
    DeletedFolder,
}

/// One mutation performed on the replica tree.
///
/// The `Display` form is the journal message, e.g. `Deleted: /replica/b.txt`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SyncEvent {
    /// A source file was copied over (or into) the replica.
    Copied {
        source: PathBuf,
        target: PathBuf,
        bytes: u64,
    },
    /// An orphaned replica file was removed.
    Deleted { path: PathBuf },
    /// A replica directory was created.
    CreatedFolder { path: PathBuf },
    /// An orphaned replica directory was removed with all its contents.
    DeletedFolder { path: PathBuf },
}

impl SyncEvent {
    /// Create a copy event.
    pub fn copied(source: impl Into<PathBuf>, target: impl Into<PathBuf>, bytes: u64) -> Self {
        Self::Copied {
            source: source.into(),
            target: target.into(),
            bytes,
        }
    }

    /// Create a file deletion event.
    pub fn deleted(path: impl Into<PathBuf>) -> Self {
        Self::Deleted { path: path.into() }
    }

    /// Create a folder creation event.
    pub fn created_folder(path: impl Into<PathBuf>) -> Self {
        Self::CreatedFolder { path: path.into() }
    }

    /// Create a folder deletion event.
    pub fn deleted_folder(path: impl Into<PathBuf>) -> Self {
        Self::DeletedFolder { path: path.into() }
    }

    /// Get the kind of this event.
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Copied { .. } => EventKind::Copied,
            Self::Deleted { .. } => EventKind::Deleted,
            Self::CreatedFolder { .. } => EventKind::CreatedFolder,
            Self::DeletedFolder { .. } => EventKind::DeletedFolder,
        }
    }
}

impl std::fmt::Display for SyncEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Copied { source, target, .. } => {
                write!(f, "Copied: {} to {}", source.display(), target.display())
            }
            Self::Deleted { path } => write!(f, "Deleted: {}", path.display()),
            Self::CreatedFolder { path } => write!(f, "Created folder: {}", path.display()),
            Self::DeletedFolder { path } => write!(f, "Deleted folder: {}", path.display()),
        }
    }
}
