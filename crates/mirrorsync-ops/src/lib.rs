//! Replica file operations for mirrorsync.
//!
//! Every mutation the synchronizer performs on the replica tree goes
//! through the [`ReplicaOps`] trait. [`LocalOps`] applies them to the
//! local filesystem; tests substitute their own implementation to inject
//! failures.

mod local;

use std::path::Path;

pub use local::LocalOps;
pub use mirrorsync_core::SyncError;

/// Mutations applied to the replica tree.
pub trait ReplicaOps {
    /// Copy `source` to `target`, replacing any existing file. Returns the
    /// number of bytes copied.
    fn copy_file(&mut self, source: &Path, target: &Path) -> Result<u64, SyncError>;

    /// Remove a single file or link.
    fn remove_file(&mut self, path: &Path) -> Result<(), SyncError>;

    /// Create one directory whose parent exists.
    fn create_dir(&mut self, path: &Path) -> Result<(), SyncError>;

    /// Create a directory and any missing parents.
    fn create_dir_all(&mut self, path: &Path) -> Result<(), SyncError>;

    /// Remove a directory and everything below it.
    fn remove_dir_all(&mut self, path: &Path) -> Result<(), SyncError>;
}

impl<T: ReplicaOps + ?Sized> ReplicaOps for Box<T> {
    fn copy_file(&mut self, source: &Path, target: &Path) -> Result<u64, SyncError> {
        (**self).copy_file(source, target)
    }

    fn remove_file(&mut self, path: &Path) -> Result<(), SyncError> {
        (**self).remove_file(path)
    }

    fn create_dir(&mut self, path: &Path) -> Result<(), SyncError> {
        (**self).create_dir(path)
    }

    fn create_dir_all(&mut self, path: &Path) -> Result<(), SyncError> {
        (**self).create_dir_all(path)
    }

    fn remove_dir_all(&mut self, path: &Path) -> Result<(), SyncError> {
        (**self).remove_dir_all(path)
    }
}
