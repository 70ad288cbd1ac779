//! Tree synchronization for mirrorsync.
//!
//! - [`TreeSynchronizer`] reconciles a replica tree with a source tree in
//!   one depth-first pass.
//! - [`EventSink`] receives every mutation; [`Journal`] writes them as
//!   timestamped lines to a log file and stdout, [`MemorySink`] keeps them
//!   for inspection.
//! - [`SyncDriver`] repeats the pass on an interval until cancelled.
//!
//! ```rust,no_run
//! use mirrorsync_sync::{Journal, SyncConfig, SyncDriver};
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn run() -> Result<(), mirrorsync_sync::SyncError> {
//! let config = SyncConfig::new("source", "replica", "sync.log", 30);
//! let mut driver = SyncDriver::new(&config, Journal::new(&config.log_file));
//!
//! let summary = driver.run(CancellationToken::new()).await?;
//! println!("{} ticks", summary.ticks);
//! # Ok(())
//! # }
//! ```
//!
//! A single pass without the driver:
//!
//! ```rust,no_run
//! use mirrorsync_sync::{MemorySink, TreeSynchronizer};
//!
//! let mut sync = TreeSynchronizer::new(MemorySink::new());
//! let report = sync.synchronize("source".as_ref(), "replica".as_ref());
//!
//! for message in sync.sink().messages() {
//!     println!("{message}");
//! }
//! assert!(!report.has_failures());
//! ```

mod driver;
mod journal;
mod synchronizer;

pub use driver::{Sleeper, SyncDriver, TokioSleeper};
pub use journal::{EventSink, Journal, MemorySink, TIMESTAMP_FORMAT, format_entry};
pub use synchronizer::TreeSynchronizer;

// Re-export core types for convenience
pub use mirrorsync_core::{
    DriverSummary, EventKind, LevelFailure, SyncConfig, SyncError, SyncEvent, SyncReport,
};
pub use mirrorsync_ops::{LocalOps, ReplicaOps};
pub use mirrorsync_scan::DirLister;
