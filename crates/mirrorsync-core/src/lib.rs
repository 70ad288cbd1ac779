//! Core types and configuration for mirrorsync.
//!
//! This crate provides the data structures shared across the mirrorsync
//! workspace: the sync configuration, the error type, mutation events
//! and per-tick reports.

mod config;
mod error;
mod event;
mod hash;
mod report;

pub use config::{SyncConfig, SyncConfigBuilder};
pub use error::{LevelFailure, SyncError};
pub use event::{EventKind, SyncEvent};
pub use hash::ContentHash;
pub use report::{DriverSummary, SyncReport};
