//! # Structure Mirroring
//!
//! Keeps the directory layout of a target tree in step with its source tree.
//!
//! ## Workflow
//!
//! 1. Walk the source tree (excluded components pruned)
//! 2. Create every directory that has no target counterpart
//! 3. Copy every file that has no target counterpart, keeping its mtime
//! 4. Walk the target tree and report entries that no longer exist in the
//!    source. These are never deleted: they may hold finished translations
//!    that a human has to move or retire.
//!
//! Existing target files are never opened for writing. Copies use
//! `create_new`, so a file that appears between the existence check and the
//! copy is left alone and reported as a failure.
//!
//! ## Error Handling
//!
//! A missing source root aborts the run. Failures on single items are logged,
//! collected in [`StructureChanges::failed`], and the run carries on.

use crate::errors::SyncError;
use crate::tracking::scanner::{EntryKind, ScanOptions, TreeScanner};
use crate::utils::paths::{ensure_parent_dirs, entry_exists, join_key};
use anyhow::{Context, Result};
use filetime::FileTime;
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

/// Outcome of one structure sync
#[derive(Debug, Default)]
pub struct StructureChanges {
    /// Directories created (or that would be created on a dry run)
    pub new_dirs: Vec<String>,
    /// Files copied (or that would be copied on a dry run)
    pub new_files: Vec<String>,
    /// Target entries with no source counterpart, for manual review
    pub removed_items: Vec<String>,
    /// Items that could not be created
    pub failed: Vec<SyncError>,
    /// Whether this was a dry run
    pub dry_run: bool,
}

impl StructureChanges {
    /// Whether the source has structure the target lacks, including items
    /// that failed to be created and are therefore still missing.
    ///
    /// Removed items alone do not count: they need a human decision, not a
    /// re-run.
    #[must_use]
    pub fn has_changes(&self) -> bool {
        !self.new_dirs.is_empty() || !self.new_files.is_empty() || !self.failed.is_empty()
    }
}

/// Additive synchronizer from one source tree to one target tree
pub struct StructureSync {
    source_root: PathBuf,
    target_root: PathBuf,
    options: ScanOptions,
}

impl StructureSync {
    /// Create a synchronizer. Extension filters in `options` are ignored;
    /// only exclusions and traversal limits apply.
    #[must_use]
    pub fn new(
        source_root: impl Into<PathBuf>,
        target_root: impl Into<PathBuf>,
        options: &ScanOptions,
    ) -> Self {
        Self {
            source_root: source_root.into(),
            target_root: target_root.into(),
            options: options.clone(),
        }
    }

    /// Bring the target structure up to date with the source.
    ///
    /// With `dry_run` the same lists are computed but nothing is created.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::SourceRootMissing`] if the source root is not a
    /// directory.
    pub fn sync(&self, dry_run: bool) -> Result<StructureChanges> {
        let span = tracing::info_span!(
            "sync_structure",
            source = %self.source_root.display(),
            target = %self.target_root.display(),
            dry_run
        );
        let _guard = span.enter();

        let mut changes = StructureChanges {
            dry_run,
            ..StructureChanges::default()
        };

        let source_entries = TreeScanner::new(&self.source_root, self.options.clone())
            .scan_entries()?;

        for entry in source_entries {
            let target_path = join_key(&self.target_root, &entry.relative_path);
            // A dangling symlink counts as present and is never overwritten
            if entry_exists(&target_path) {
                continue;
            }

            match entry.kind {
                EntryKind::Directory => {
                    if !dry_run {
                        if let Err(e) = fs::create_dir_all(&target_path) {
                            record_failure(&mut changes, &target_path, e);
                            continue;
                        }
                        tracing::info!(dir = %entry.relative_path, "Created directory");
                    }
                    changes.new_dirs.push(entry.relative_path);
                }
                EntryKind::File => {
                    if !dry_run {
                        let source_path = join_key(&self.source_root, &entry.relative_path);
                        if let Err(e) = copy_preserving_mtime(&source_path, &target_path) {
                            record_failure(&mut changes, &target_path, e);
                            continue;
                        }
                        tracing::info!(file = %entry.relative_path, "Copied file");
                    }
                    changes.new_files.push(entry.relative_path);
                }
            }
        }

        self.collect_removed(&mut changes)?;

        tracing::info!(
            new_dirs = changes.new_dirs.len(),
            new_files = changes.new_files.len(),
            removed = changes.removed_items.len(),
            failed = changes.failed.len(),
            "Structure sync finished"
        );

        Ok(changes)
    }

    /// List target entries whose source counterpart is gone
    fn collect_removed(&self, changes: &mut StructureChanges) -> Result<()> {
        if !self.target_root.is_dir() {
            tracing::debug!(target = %self.target_root.display(), "Target root absent, nothing to review");
            return Ok(());
        }

        let target_entries = TreeScanner::new(&self.target_root, self.options.clone())
            .scan_entries()?;

        for entry in target_entries {
            if !entry_exists(&join_key(&self.source_root, &entry.relative_path)) {
                tracing::warn!(
                    item = %entry.relative_path,
                    "Removed from source, needs manual review"
                );
                changes.removed_items.push(entry.relative_path);
            }
        }
        Ok(())
    }
}

fn record_failure(changes: &mut StructureChanges, path: &Path, err: impl std::fmt::Display) {
    let failure = SyncError::item_failure(path, err);
    tracing::warn!("{failure}");
    changes.failed.push(failure);
}

/// Copy a file to a path that must not exist yet, creating missing parent
/// directories and keeping the source permissions and timestamps.
///
/// # Errors
///
/// Returns an error if `to` already exists, or if reading, writing or
/// updating metadata fails. A partially written copy is removed.
pub fn copy_preserving_mtime(from: &Path, to: &Path) -> Result<()> {
    ensure_parent_dirs(to)?;

    let mut reader =
        File::open(from).with_context(|| format!("Failed to open {}", from.display()))?;
    let metadata = reader
        .metadata()
        .with_context(|| format!("Failed to read metadata of {}", from.display()))?;

    let mut writer = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(to)
        .with_context(|| format!("Refusing to create {}", to.display()))?;

    if let Err(e) = io::copy(&mut reader, &mut writer) {
        drop(writer);
        let _ = fs::remove_file(to);
        return Err(e).with_context(|| format!("Failed to copy {}", from.display()));
    }
    drop(writer);

    fs::set_permissions(to, metadata.permissions())
        .with_context(|| format!("Failed to set permissions on {}", to.display()))?;

    let atime = FileTime::from_last_access_time(&metadata);
    let mtime = FileTime::from_last_modification_time(&metadata);
    filetime::set_file_times(to, atime, mtime)
        .with_context(|| format!("Failed to set timestamps on {}", to.display()))?;

    Ok(())
}
