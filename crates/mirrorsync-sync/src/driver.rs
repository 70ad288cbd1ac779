//! Polling driver: one synchronization tick per interval until cancelled.

use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use mirrorsync_core::{DriverSummary, SyncConfig, SyncError, SyncReport};
use mirrorsync_ops::{LocalOps, ReplicaOps};

use crate::journal::EventSink;
use crate::synchronizer::TreeSynchronizer;

/// Waits between ticks.
pub trait Sleeper {
    /// Resolve after `period` has elapsed.
    fn sleep(&self, period: Duration) -> impl Future<Output = ()> + Send;
}

/// Sleeps on the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

impl Sleeper for TokioSleeper {
    fn sleep(&self, period: Duration) -> impl Future<Output = ()> + Send {
        tokio::time::sleep(period)
    }
}

/// Runs the synchronizer on a fixed interval.
///
/// Each tick executes on a blocking thread and runs to completion;
/// cancellation is observed between ticks only.
pub struct SyncDriver<S, O = LocalOps, Z = TokioSleeper> {
    source: PathBuf,
    replica: PathBuf,
    interval: Duration,
    max_ticks: Option<u64>,
    synchronizer: Option<TreeSynchronizer<S, O>>,
    sleeper: Z,
    summary: DriverSummary,
}

impl<S> SyncDriver<S>
where
    S: EventSink + Send + 'static,
{
    /// Create a driver for a config, mutating the local filesystem.
    pub fn new(config: &SyncConfig, sink: S) -> Self {
        let synchronizer = TreeSynchronizer::from_config(config, sink, LocalOps::new());
        Self::with_parts(config, synchronizer, TokioSleeper)
    }
}

impl<S, O, Z> SyncDriver<S, O, Z>
where
    S: EventSink + Send + 'static,
    O: ReplicaOps + Send + 'static,
    Z: Sleeper,
{
    /// Create a driver from an existing synchronizer and sleeper.
    pub fn with_parts(config: &SyncConfig, synchronizer: TreeSynchronizer<S, O>, sleeper: Z) -> Self {
        Self {
            source: config.source.clone(),
            replica: config.replica.clone(),
            interval: config.interval(),
            max_ticks: config.max_ticks,
            synchronizer: Some(synchronizer),
            sleeper,
            summary: DriverSummary::new(),
        }
    }

    /// Totals of the ticks run so far.
    pub fn summary(&self) -> &DriverSummary {
        &self.summary
    }

    /// The synchronizer, unless a tick panicked and took it down.
    pub fn synchronizer(&self) -> Option<&TreeSynchronizer<S, O>> {
        self.synchronizer.as_ref()
    }

    /// Tick, sleep, repeat until `cancel` fires or the tick limit is reached.
    pub async fn run(&mut self, cancel: CancellationToken) -> Result<DriverSummary, SyncError> {
        tracing::info!(
            source = %self.source.display(),
            replica = %self.replica.display(),
            interval_secs = self.interval.as_secs(),
            "driver started"
        );

        loop {
            if cancel.is_cancelled() {
                break;
            }

            self.tick().await?;

            let attempted = self.summary.ticks + self.summary.skipped_ticks;
            if self.max_ticks.is_some_and(|max| attempted >= max) {
                break;
            }

            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                _ = self.sleeper.sleep(self.interval) => {}
            }
        }

        tracing::info!(ticks = self.summary.ticks, "driver stopped");
        Ok(self.summary.clone())
    }

    /// Run a single tick.
    ///
    /// Returns `Ok(None)` when the tick was skipped because the replica root
    /// could not be prepared. Only a panicked tick is an error.
    pub async fn tick(&mut self) -> Result<Option<SyncReport>, SyncError> {
        let mut synchronizer = self.synchronizer.take().ok_or_else(|| SyncError::TaskFailed {
            message: "synchronizer was lost in an earlier tick".to_string(),
        })?;
        let source = self.source.clone();
        let replica = self.replica.clone();

        let (synchronizer, outcome) = tokio::task::spawn_blocking(move || {
            let outcome = synchronizer.tick(&source, &replica);
            (synchronizer, outcome)
        })
        .await
        .map_err(|e| SyncError::TaskFailed {
            message: e.to_string(),
        })?;
        self.synchronizer = Some(synchronizer);

        match outcome {
            Ok(report) => {
                self.summary.absorb(&report);
                tracing::info!(
                    tick = self.summary.ticks,
                    copied = report.files_copied,
                    deleted = report.files_deleted,
                    folders_created = report.folders_created,
                    folders_deleted = report.folders_deleted,
                    failures = report.failures.len(),
                    elapsed_ms = report.duration.as_millis() as u64,
                    "tick complete"
                );
                Ok(Some(report))
            }
            Err(err) => {
                self.summary.skipped_ticks += 1;
                tracing::error!(replica = %self.replica.display(), "Error: {err}");
                Ok(None)
            }
        }
    }
}
