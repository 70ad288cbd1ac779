//! Recursive one-way reconciliation of a replica tree.

use std::path::Path;
use std::time::Instant;

use mirrorsync_compare::{CompareConfig, ContentComparator};
use mirrorsync_core::{LevelFailure, SyncConfig, SyncError, SyncEvent, SyncReport};
use mirrorsync_ops::{LocalOps, ReplicaOps};
use mirrorsync_scan::{DirLister, DirListing, EntryKind};

use crate::journal::EventSink;

/// Makes a replica directory tree match a source tree.
///
/// Each directory level is reconciled in four passes, in this order:
///
/// 1. copy source files that are missing from the replica or differ,
/// 2. delete replica files with no source file of the same name,
/// 3. create missing replica subdirectories and recurse into each one,
/// 4. delete replica subdirectories with no source counterpart.
///
/// An error anywhere in a level abandons the rest of that level, including
/// descent into children not yet visited. Sibling levels are unaffected.
///
/// Links inside the replica are never followed, whatever the source-side
/// link policy, so no mutation reaches outside the replica tree.
pub struct TreeSynchronizer<S, O = LocalOps> {
    source_lister: DirLister,
    replica_lister: DirLister,
    comparator: ContentComparator,
    ops: O,
    sink: S,
}

impl<S: EventSink> TreeSynchronizer<S, LocalOps> {
    /// Create a synchronizer that mutates the local filesystem.
    pub fn new(sink: S) -> Self {
        Self::with_ops(sink, LocalOps::new())
    }
}

impl<S: EventSink, O: ReplicaOps> TreeSynchronizer<S, O> {
    /// Create a synchronizer with custom replica operations.
    pub fn with_ops(sink: S, ops: O) -> Self {
        Self {
            source_lister: DirLister::new(),
            replica_lister: DirLister::new(),
            comparator: ContentComparator::new(),
            ops,
            sink,
        }
    }

    /// Create a synchronizer honoring the listing and comparison options of a config.
    pub fn from_config(config: &SyncConfig, sink: S, ops: O) -> Self {
        let compare = CompareConfig {
            quick_compare: config.quick_compare,
            ..CompareConfig::default()
        };
        Self::with_ops(sink, ops)
            .with_lister(DirLister::new().follow_symlinks(config.follow_symlinks))
            .with_comparator(ContentComparator::with_config(compare))
    }

    /// Replace the lister used on the source side.
    pub fn with_lister(mut self, lister: DirLister) -> Self {
        self.source_lister = lister;
        self
    }

    /// Replace the content comparator.
    pub fn with_comparator(mut self, comparator: ContentComparator) -> Self {
        self.comparator = comparator;
        self
    }

    /// The event sink.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Mutable access to the event sink.
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Run one polling tick: make sure the replica root exists, then
    /// synchronize.
    ///
    /// A root that is a link to a directory is used as is. Returns an error
    /// only when the replica root is unusable and cannot be created, in which
    /// case nothing else was attempted.
    pub fn tick(&mut self, source: &Path, replica: &Path) -> Result<SyncReport, SyncError> {
        let start = Instant::now();
        let mut report = SyncReport::new();

        match self.replica_lister.probe_target(replica)? {
            Some(EntryKind::Dir) => {}
            None => {
                self.ops.create_dir_all(replica)?;
                self.emit(SyncEvent::created_folder(replica), &mut report);
            }
            Some(_) => {
                return Err(SyncError::NotADirectory {
                    path: replica.to_path_buf(),
                });
            }
        }

        self.sync_level(source, replica, &mut report);
        report.duration = start.elapsed();
        Ok(report)
    }

    /// Reconcile `replica` with `source`, recursively.
    ///
    /// Both directories are expected to exist. Failures are reported and
    /// recorded in the returned report; none escape.
    pub fn synchronize(&mut self, source: &Path, replica: &Path) -> SyncReport {
        let start = Instant::now();
        let mut report = SyncReport::new();
        self.sync_level(source, replica, &mut report);
        report.duration = start.elapsed();
        report
    }

    fn sync_level(&mut self, source: &Path, replica: &Path, report: &mut SyncReport) {
        if let Err(err) = self.reconcile_level(source, replica, report) {
            tracing::error!(
                source = %source.display(),
                replica = %replica.display(),
                "Error: {err}"
            );
            report.record_failure(LevelFailure::new(source, replica, &err));
        }
    }

    fn reconcile_level(
        &mut self,
        source: &Path,
        replica: &Path,
        report: &mut SyncReport,
    ) -> Result<(), SyncError> {
        let source_listing = self.source_lister.list(source)?;
        self.sync_files(&source_listing, replica, report)?;

        let replica_listing = self.replica_lister.list(replica)?;
        self.prune_files(source, &replica_listing, report)?;

        self.sync_dirs(&source_listing, replica, report)?;
        self.prune_dirs(source, &replica_listing, report)
    }

    /// Pass 1: copy new and changed files.
    fn sync_files(
        &mut self,
        source: &DirListing,
        replica: &Path,
        report: &mut SyncReport,
    ) -> Result<(), SyncError> {
        for name in &source.files {
            let source_file = source.path.join(name);
            let target = replica.join(name);

            let stale = match self.replica_lister.probe(&target)? {
                None => true,
                Some(EntryKind::File) => !self.comparator.files_equal(&source_file, &target)?,
                Some(EntryKind::Dir) => {
                    self.ops.remove_dir_all(&target)?;
                    self.emit(SyncEvent::deleted_folder(&target), report);
                    true
                }
                Some(EntryKind::Symlink | EntryKind::Other) => {
                    self.ops.remove_file(&target)?;
                    self.emit(SyncEvent::deleted(&target), report);
                    true
                }
            };

            if stale {
                let bytes = self.ops.copy_file(&source_file, &target)?;
                self.emit(SyncEvent::copied(source_file, target, bytes), report);
            }
        }
        Ok(())
    }

    /// Pass 2: delete replica files that have no source file.
    fn prune_files(
        &mut self,
        source: &Path,
        replica: &DirListing,
        report: &mut SyncReport,
    ) -> Result<(), SyncError> {
        for name in &replica.files {
            if self.source_lister.probe(&source.join(name))? != Some(EntryKind::File) {
                let path = replica.path.join(name);
                self.ops.remove_file(&path)?;
                self.emit(SyncEvent::deleted(path), report);
            }
        }
        Ok(())
    }

    /// Pass 3: create missing subdirectories and descend depth-first.
    fn sync_dirs(
        &mut self,
        source: &DirListing,
        replica: &Path,
        report: &mut SyncReport,
    ) -> Result<(), SyncError> {
        for name in &source.dirs {
            let source_dir = source.path.join(name);
            let target = replica.join(name);

            match self.replica_lister.probe(&target)? {
                Some(EntryKind::Dir) => {}
                None => {
                    self.ops.create_dir(&target)?;
                    self.emit(SyncEvent::created_folder(&target), report);
                }
                Some(_) => {
                    self.ops.remove_file(&target)?;
                    self.emit(SyncEvent::deleted(&target), report);
                    self.ops.create_dir(&target)?;
                    self.emit(SyncEvent::created_folder(&target), report);
                }
            }

            self.sync_level(&source_dir, &target, report);
        }
        Ok(())
    }

    /// Pass 4: delete replica subdirectories that have no source directory.
    fn prune_dirs(
        &mut self,
        source: &Path,
        replica: &DirListing,
        report: &mut SyncReport,
    ) -> Result<(), SyncError> {
        for name in &replica.dirs {
            if self.source_lister.probe(&source.join(name))? != Some(EntryKind::Dir) {
                let path = replica.path.join(name);
                self.ops.remove_dir_all(&path)?;
                self.emit(SyncEvent::deleted_folder(path), report);
            }
        }
        Ok(())
    }

    fn emit(&mut self, event: SyncEvent, report: &mut SyncReport) {
        tracing::debug!(kind = ?event.kind(), "{event}");
        report.record(&event);
        self.sink.record(&event);
    }
}
