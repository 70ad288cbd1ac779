//! Per-tick reports and driver summaries.

use std::time::Duration;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::error::LevelFailure;
use crate::event::SyncEvent;

/// Outcome of one synchronization pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncReport {
    /// When the pass started.
    pub started_at: DateTime<Local>,
    /// Duration of the pass.
    pub duration: Duration,
    /// Files copied into the replica (new or changed).
    pub files_copied: u64,
    /// Bytes written by those copies.
    pub bytes_copied: u64,
    /// Orphaned replica files removed.
    pub files_deleted: u64,
    /// Replica directories created.
    pub folders_created: u64,
    /// Orphaned replica directories removed.
    pub folders_deleted: u64,
    /// Directory levels abandoned because of an error.
    pub failures: Vec<LevelFailure>,
}

impl Default for SyncReport {
    fn default() -> Self {
        Self {
            started_at: Local::now(),
            duration: Duration::ZERO,
            files_copied: 0,
            bytes_copied: 0,
            files_deleted: 0,
            folders_created: 0,
            folders_deleted: 0,
            failures: Vec::new(),
        }
    }
}

impl SyncReport {
    /// Create a new empty report starting now.
    pub fn new() -> Self {
        Self::default()
    }

    /// Update counters with a mutation event.
    pub fn record(&mut self, event: &SyncEvent) {
        match event {
            SyncEvent::Copied { bytes, .. } => {
                self.files_copied += 1;
                self.bytes_copied += bytes;
            }
            SyncEvent::Deleted { .. } => self.files_deleted += 1,
            SyncEvent::CreatedFolder { .. } => self.folders_created += 1,
            SyncEvent::DeletedFolder { .. } => self.folders_deleted += 1,
        }
    }

    /// Record an abandoned directory level.
    pub fn record_failure(&mut self, failure: LevelFailure) {
        self.failures.push(failure);
    }

    /// Total number of mutations performed.
    pub fn mutations(&self) -> u64 {
        self.files_copied + self.files_deleted + self.folders_created + self.folders_deleted
    }

    /// Check if any directory level failed.
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    /// Check if the pass changed nothing and hit no errors.
    pub fn is_noop(&self) -> bool {
        self.mutations() == 0 && !self.has_failures()
    }
}

/// Totals across every tick a driver ran.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverSummary {
    /// Number of ticks executed.
    pub ticks: u64,
    /// Ticks skipped because the replica root could not be created.
    pub skipped_ticks: u64,
    pub files_copied: u64,
    pub bytes_copied: u64,
    pub files_deleted: u64,
    pub folders_created: u64,
    pub folders_deleted: u64,
    /// Directory levels abandoned over all ticks.
    pub failures: u64,
}

impl DriverSummary {
    /// Create an empty summary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a completed tick into the totals.
    pub fn absorb(&mut self, report: &SyncReport) {
        self.ticks += 1;
        self.files_copied += report.files_copied;
        self.bytes_copied += report.bytes_copied;
        self.files_deleted += report.files_deleted;
        self.folders_created += report.folders_created;
        self.folders_deleted += report.folders_deleted;
        self.failures += report.failures.len() as u64;
    }

    /// Total number of mutations performed.
    pub fn mutations(&self) -> u64 {
        self.files_copied + self.files_deleted + self.folders_created + self.folders_deleted
    }
}
