//! Sync configuration types.

use std::path::{Path, PathBuf};
use std::time::Duration;

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::error::SyncError;

/// Configuration for a mirroring session.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct SyncConfig {
    /// Root of the tree to mirror from.
    pub source: PathBuf,

    /// Root of the tree to mirror to.
    pub replica: PathBuf,

    /// Append-only journal of mutations.
    pub log_file: PathBuf,

    /// Seconds to wait between ticks.
    pub interval_secs: u64,

    /// Treat symbolic links as the files or directories they point to.
    #[builder(default = "false")]
    #[serde(default)]
    pub follow_symlinks: bool,

    /// Skip hashing when file lengths already differ.
    #[builder(default = "true")]
    #[serde(default = "default_true")]
    pub quick_compare: bool,

    /// Stop after this many ticks (None = run until cancelled).
    #[builder(default, setter(into, strip_option))]
    #[serde(default)]
    pub max_ticks: Option<u64>,

    /// Echo journal lines to stdout.
    #[builder(default = "true")]
    #[serde(default = "default_true")]
    pub echo_to_console: bool,
}

fn default_true() -> bool {
    true
}

impl SyncConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        let source = required_path(self.source.as_ref(), "Source")?;
        let replica = required_path(self.replica.as_ref(), "Replica")?;
        required_path(self.log_file.as_ref(), "Log file")?;
        if self.interval_secs == Some(0) {
            return Err("Sync interval must be a positive number of seconds".to_string());
        }
        check_disjoint(source, replica)
    }
}

fn required_path<'a>(path: Option<&'a PathBuf>, what: &str) -> Result<&'a Path, String> {
    match path {
        Some(path) if path.as_os_str().is_empty() => Err(format!("{what} path cannot be empty")),
        Some(path) => Ok(path),
        None => Err(format!("{what} path is required")),
    }
}

/// Neither root may contain the other, otherwise a tick would mirror the
/// replica into itself or prune the source.
fn check_disjoint(source: &Path, replica: &Path) -> Result<(), String> {
    if replica.starts_with(source) {
        return Err(format!(
            "Replica {} must not be the source or lie inside it",
            replica.display()
        ));
    }
    if source.starts_with(replica) {
        return Err(format!(
            "Source {} must not lie inside the replica",
            source.display()
        ));
    }
    Ok(())
}

impl SyncConfig {
    /// Create a new config builder.
    pub fn builder() -> SyncConfigBuilder {
        SyncConfigBuilder::default()
    }

    /// Create a config with default options.
    pub fn new(
        source: impl Into<PathBuf>,
        replica: impl Into<PathBuf>,
        log_file: impl Into<PathBuf>,
        interval_secs: u64,
    ) -> Self {
        Self {
            source: source.into(),
            replica: replica.into(),
            log_file: log_file.into(),
            interval_secs,
            follow_symlinks: false,
            quick_compare: true,
            max_ticks: None,
            echo_to_console: true,
        }
    }

    /// Check a config that did not come from the builder.
    pub fn validate(&self) -> Result<(), SyncError> {
        let invalid = |message: String| SyncError::InvalidConfig { message };
        required_path(Some(&self.source), "Source").map_err(invalid)?;
        required_path(Some(&self.replica), "Replica").map_err(invalid)?;
        required_path(Some(&self.log_file), "Log file").map_err(invalid)?;
        if self.interval_secs == 0 {
            return Err(invalid(
                "Sync interval must be a positive number of seconds".to_string(),
            ));
        }
        check_disjoint(&self.source, &self.replica).map_err(invalid)
    }

    /// Time to wait between ticks.
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}
