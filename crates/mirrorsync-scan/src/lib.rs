//! Directory listing for mirrorsync.
//!
//! The synchronizer reconciles one directory level at a time, so this
//! crate lists exactly one level: the regular files and subdirectories
//! directly inside a path, sorted by name. Traversal goes through jwalk.
//!
//! # Example
//!
//! ```rust,no_run
//! use mirrorsync_scan::DirLister;
//!
//! let lister = DirLister::new();
//! let listing = lister.list("/path/to/source".as_ref()).unwrap();
//!
//! for name in &listing.files {
//!     println!("file: {}", name.to_string_lossy());
//! }
//! for name in &listing.dirs {
//!     println!("dir:  {}", name.to_string_lossy());
//! }
//! ```
//!
//! # Symbolic links
//!
//! Links are skipped unless [`DirLister::follow_symlinks`] is enabled, in
//! which case they are listed as whatever they point to and broken links
//! are skipped.

mod listing;

pub use listing::{DirLister, DirListing, EntryKind};

// Re-export core types for convenience
pub use mirrorsync_core::SyncError;
