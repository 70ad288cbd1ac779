//! Local filesystem implementation of replica operations.

use std::fs;
use std::path::Path;

use crate::{ReplicaOps, SyncError};

/// Applies replica mutations with `std::fs`.
///
/// Content is streamed by `fs::copy`; permissions follow whatever the
/// host copy primitive preserves.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalOps;

impl LocalOps {
    /// Create a new local operations handle.
    pub fn new() -> Self {
        Self
    }
}

impl ReplicaOps for LocalOps {
    fn copy_file(&mut self, source: &Path, target: &Path) -> Result<u64, SyncError> {
        let bytes = fs::copy(source, target).map_err(|e| {
            // fs::copy does not say which side failed
            let failed = if fs::File::open(source).is_ok() { target } else { source };
            SyncError::io(failed, e)
        })?;
        tracing::trace!(source = %source.display(), target = %target.display(), bytes, "copied");
        Ok(bytes)
    }

    fn remove_file(&mut self, path: &Path) -> Result<(), SyncError> {
        fs::remove_file(path).map_err(|e| SyncError::io(path, e))
    }

    fn create_dir(&mut self, path: &Path) -> Result<(), SyncError> {
        fs::create_dir(path).map_err(|e| SyncError::io(path, e))
    }

    fn create_dir_all(&mut self, path: &Path) -> Result<(), SyncError> {
        fs::create_dir_all(path).map_err(|e| SyncError::io(path, e))
    }

    fn remove_dir_all(&mut self, path: &Path) -> Result<(), SyncError> {
        fs::remove_dir_all(path).map_err(|e| SyncError::io(path, e))
    }
}
