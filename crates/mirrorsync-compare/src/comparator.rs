//! Whole-file content comparison using BLAKE3 digests.

use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

use blake3::Hasher;
use derive_builder::Builder;

use mirrorsync_core::{ContentHash, SyncError};

/// Configuration for content comparison.
#[derive(Debug, Clone, Builder)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct CompareConfig {
    /// Report files of different length as different without hashing.
    #[builder(default = "true")]
    pub quick_compare: bool,

    /// Read buffer size used while hashing.
    #[builder(default = "64 * 1024")]
    pub buffer_size: usize,
}

impl CompareConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if self.buffer_size == Some(0) {
            return Err("Buffer size must be greater than zero".to_string());
        }
        Ok(())
    }
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self {
            quick_compare: true,
            buffer_size: 64 * 1024,
        }
    }
}

impl CompareConfig {
    /// Create a new config builder.
    pub fn builder() -> CompareConfigBuilder {
        CompareConfigBuilder::default()
    }
}

/// Decides whether two files have byte-identical content.
#[derive(Debug, Clone, Default)]
pub struct ContentComparator {
    config: CompareConfig,
}

impl ContentComparator {
    /// Create a comparator with default config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a comparator with custom config.
    pub fn with_config(config: CompareConfig) -> Self {
        Self { config }
    }

    /// Get the active config.
    pub fn config(&self) -> &CompareConfig {
        &self.config
    }

    /// Check whether two existing files have identical content.
    ///
    /// Both files are opened before anything is decided, so an unreadable
    /// file is always an error and never reported as "different".
    pub fn files_equal(&self, a: &Path, b: &Path) -> Result<bool, SyncError> {
        let mut file_a = File::open(a).map_err(|e| SyncError::io(a, e))?;
        let mut file_b = File::open(b).map_err(|e| SyncError::io(b, e))?;

        if self.config.quick_compare {
            let len_a = file_a.metadata().map_err(|e| SyncError::io(a, e))?.len();
            let len_b = file_b.metadata().map_err(|e| SyncError::io(b, e))?.len();
            if len_a != len_b {
                tracing::debug!(a = %a.display(), b = %b.display(), len_a, len_b, "length differs");
                return Ok(false);
            }
        }

        let hash_a = self.hash_reader(&mut file_a, a)?;
        let hash_b = self.hash_reader(&mut file_b, b)?;
        Ok(hash_a == hash_b)
    }

    /// Compute the full BLAKE3 hash of a file.
    pub fn hash_file(&self, path: &Path) -> Result<ContentHash, SyncError> {
        let mut file = File::open(path).map_err(|e| SyncError::io(path, e))?;
        self.hash_reader(&mut file, path)
    }

    fn hash_reader(&self, reader: &mut impl Read, path: &Path) -> Result<ContentHash, SyncError> {
        let mut hasher = Hasher::new();
        let mut buffer = vec![0u8; self.config.buffer_size];

        loop {
            let bytes_read = match reader.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(SyncError::io(path, e)),
            };
            hasher.update(&buffer[..bytes_read]);
        }

        Ok(ContentHash::new(*hasher.finalize().as_bytes()))
    }
}
