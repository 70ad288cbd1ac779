//! Single-level directory listing built on jwalk.

use std::ffi::OsString;
use std::fs::{self, FileType};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use jwalk::{Parallelism, WalkDir};

use mirrorsync_core::SyncError;

/// What a path on disk turned out to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Dir,
    /// A link that is not being followed, or a broken one.
    Symlink,
    /// Sockets, FIFOs, devices.
    Other,
}

impl EntryKind {
    fn from_file_type(file_type: FileType) -> Self {
        if file_type.is_symlink() {
            Self::Symlink
        } else if file_type.is_dir() {
            Self::Dir
        } else if file_type.is_file() {
            Self::File
        } else {
            Self::Other
        }
    }
}

/// Entries found directly inside one directory.
#[derive(Debug, Clone, Default)]
pub struct DirListing {
    /// The directory that was listed.
    pub path: PathBuf,
    /// Names of regular files, sorted.
    pub files: Vec<OsString>,
    /// Names of subdirectories, sorted.
    pub dirs: Vec<OsString>,
    /// Entries that were neither (links, special files).
    pub skipped: usize,
}

impl DirListing {
    /// Check if the directory had no files and no subdirectories.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty() && self.dirs.is_empty()
    }
}

/// Lists directory levels and classifies individual paths.
#[derive(Debug, Clone, Default)]
pub struct DirLister {
    follow_symlinks: bool,
}

impl DirLister {
    /// Create a lister that skips symbolic links.
    pub fn new() -> Self {
        Self::default()
    }

    /// Treat links as the entries they point to.
    pub fn follow_symlinks(mut self, follow: bool) -> Self {
        self.follow_symlinks = follow;
        self
    }

    /// List the files and subdirectories directly inside `dir`.
    pub fn list(&self, dir: &Path) -> Result<DirListing, SyncError> {
        let metadata = fs::metadata(dir).map_err(|e| SyncError::io(dir, e))?;
        if !metadata.is_dir() {
            return Err(SyncError::NotADirectory {
                path: dir.to_path_buf(),
            });
        }
        // Surface an unreadable directory as an error rather than an empty listing.
        drop(fs::read_dir(dir).map_err(|e| SyncError::io(dir, e))?);

        let walker = WalkDir::new(dir)
            .parallelism(Parallelism::Serial)
            .skip_hidden(false)
            .follow_links(false)
            .min_depth(1)
            .max_depth(1);

        let mut listing = DirListing {
            path: dir.to_path_buf(),
            ..Default::default()
        };

        for entry_result in walker {
            let entry = entry_result.map_err(|err| walk_error(dir, err))?;
            let name = entry.file_name().to_os_string();

            let kind = match EntryKind::from_file_type(entry.file_type()) {
                EntryKind::Symlink if self.follow_symlinks => self.resolve_link(&entry.path())?,
                kind => kind,
            };

            match kind {
                EntryKind::File => listing.files.push(name),
                EntryKind::Dir => listing.dirs.push(name),
                EntryKind::Symlink | EntryKind::Other => {
                    tracing::debug!(path = %entry.path().display(), ?kind, "skipping entry");
                    listing.skipped += 1;
                }
            }
        }

        listing.files.sort_unstable();
        listing.dirs.sort_unstable();
        Ok(listing)
    }

    /// Classify a single path, returning `None` if nothing exists there.
    pub fn probe(&self, path: &Path) -> Result<Option<EntryKind>, SyncError> {
        let metadata = match fs::symlink_metadata(path) {
            Ok(m) => m,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(SyncError::io(path, e)),
        };

        match EntryKind::from_file_type(metadata.file_type()) {
            EntryKind::Symlink if self.follow_symlinks => self.resolve_link(path).map(Some),
            kind => Ok(Some(kind)),
        }
    }

    /// Classify whatever `path` ultimately points to, following links
    /// regardless of the lister's link policy.
    ///
    /// Returns `None` if nothing exists there, including a broken link.
    pub fn probe_target(&self, path: &Path) -> Result<Option<EntryKind>, SyncError> {
        match fs::metadata(path) {
            Ok(target) => Ok(Some(EntryKind::from_file_type(target.file_type()))),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(SyncError::io(path, e)),
        }
    }

    /// Classify a link by its target; broken links stay links.
    fn resolve_link(&self, path: &Path) -> Result<EntryKind, SyncError> {
        Ok(self.probe_target(path)?.unwrap_or(EntryKind::Symlink))
    }
}

fn walk_error(dir: &Path, err: jwalk::Error) -> SyncError {
    let path = err
        .path()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| dir.to_path_buf());
    match err.io_error() {
        Some(io) => SyncError::io(path, std::io::Error::new(io.kind(), io.to_string())),
        None => SyncError::Walk {
            path,
            message: err.to_string(),
        },
    }
}
