//! Content comparison for mirrorsync.
//!
//! Decides whether two files hold byte-identical content by streaming
//! each one through BLAKE3 and comparing the digests. Files are read in
//! fixed-size chunks, so memory use does not grow with file size.
//!
//! ```rust,no_run
//! use mirrorsync_compare::ContentComparator;
//!
//! let comparator = ContentComparator::new();
//! let same = comparator
//!     .files_equal("source/a.txt".as_ref(), "replica/a.txt".as_ref())
//!     .unwrap();
//!
//! if !same {
//!     println!("replica copy is stale");
//! }
//! ```

mod comparator;

pub use comparator::{CompareConfig, CompareConfigBuilder, ContentComparator};

// Re-export core types
pub use mirrorsync_core::{ContentHash, SyncError};
