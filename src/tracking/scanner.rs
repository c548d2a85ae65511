//! Tree scanner for enumerating source and target trees.
//!
//! The scanner walks one root and reports `/`-separated paths relative to it.
//! Excluded path components are pruned with `filter_entry`, so an excluded
//! directory is never descended into.

use crate::config::Config;
use crate::errors::SyncError;
use crate::utils::ExclusionSet;
use crate::utils::paths::relative_key;
use anyhow::Result;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Filters shared by every walk of a source or target tree
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Eligible extensions, lowercase and without the dot; empty means all
    pub extensions: HashSet<String>,
    /// Components pruned during traversal
    pub exclusions: ExclusionSet,
    /// Whether to follow symbolic links
    pub follow_symlinks: bool,
    /// Upper bound on traversal depth
    pub max_depth: usize,
}

impl ScanOptions {
    /// Build scan options from configuration. The state file name is always
    /// excluded, even if the configured list forgets it.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        let mut exclusions = ExclusionSet::new(&config.tracking.exclude);
        exclusions.insert(&config.paths.state_file);

        Self {
            extensions: config
                .tracking
                .extensions
                .iter()
                .map(|ext| ext.trim().trim_start_matches('.').to_ascii_lowercase())
                .collect(),
            exclusions,
            follow_symlinks: config.tracking.follow_symlinks,
            max_depth: config.tracking.max_depth,
        }
    }

    /// Replace the eligible extension set
    #[must_use]
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.extensions = extensions
            .into_iter()
            .map(|ext| ext.as_ref().trim_start_matches('.').to_ascii_lowercase())
            .collect();
        self
    }

    /// Whether a file name has an eligible extension
    #[must_use]
    pub fn is_eligible(&self, path: &Path) -> bool {
        if self.extensions.is_empty() {
            return true;
        }
        path.extension()
            .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
            .is_some_and(|ext| self.extensions.contains(&ext))
    }
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Kind of a tree entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    /// A directory
    Directory,
    /// A regular file
    File,
}

/// One directory or file found under a root
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TreeEntry {
    /// `/`-separated path relative to the scanned root
    pub relative_path: String,
    /// Whether the entry is a directory or a file
    pub kind: EntryKind,
}

/// Scanner for one root directory
pub struct TreeScanner {
    /// Root being scanned
    root: PathBuf,
    /// Filters applied during the walk
    options: ScanOptions,
}

impl TreeScanner {
    /// Create a new scanner
    ///
    /// # Arguments
    ///
    /// * `root` - Directory to scan
    /// * `options` - Extension and exclusion filters
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, options: ScanOptions) -> Self {
        Self {
            root: root.into(),
            options,
        }
    }

    /// Sorted relative paths of every eligible regular file under the root
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::SourceRootMissing`] if the root is not a directory.
    pub fn scan_files(&self) -> Result<Vec<String>> {
        let span = self.span();
        let _guard = span.enter();

        let mut files: Vec<String> = self
            .walk()?
            .filter(|entry| entry.file_type().is_file() && self.options.is_eligible(entry.path()))
            .filter_map(|entry| relative_key(entry.path(), &self.root))
            .collect();

        files.sort();
        files.dedup();
        Ok(files)
    }

    /// Every directory and file under the root, parents before children.
    /// Extension filters do not apply.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::SourceRootMissing`] if the root is not a directory.
    pub fn scan_entries(&self) -> Result<Vec<TreeEntry>> {
        let span = self.span();
        let _guard = span.enter();

        let entries = self
            .walk()?
            .filter_map(|entry| {
                let kind = if entry.file_type().is_dir() {
                    EntryKind::Directory
                } else if entry.file_type().is_file() {
                    EntryKind::File
                } else {
                    return None;
                };
                relative_key(entry.path(), &self.root)
                    .map(|relative_path| TreeEntry { relative_path, kind })
            })
            .collect();

        Ok(entries)
    }

    /// Span covering one full traversal. Entered by the caller that drains
    /// [`Self::walk`], since the walk itself is lazy.
    fn span(&self) -> tracing::Span {
        tracing::debug_span!("scan", root = %self.root.display())
    }

    /// Walk the root, pruning excluded components and logging unreadable
    /// entries instead of failing
    fn walk(&self) -> Result<impl Iterator<Item = DirEntry> + '_> {
        if !self.root.is_dir() {
            return Err(SyncError::SourceRootMissing(self.root.clone()).into());
        }

        tracing::debug!(
            exclusions = self.options.exclusions.len(),
            follow_symlinks = self.options.follow_symlinks,
            "Walking tree"
        );

        let iter = WalkDir::new(&self.root)
            .follow_links(self.options.follow_symlinks)
            .max_depth(self.options.max_depth)
            .min_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| !self.should_skip_entry(e))
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(err) => {
                    if let Some(ancestor) = err.loop_ancestor() {
                        tracing::warn!(
                            path = ?err.path(),
                            ancestor = %ancestor.display(),
                            "Symlink cycle detected, skipping"
                        );
                    } else {
                        tracing::warn!(path = ?err.path(), error = %err, "Skipping unreadable entry");
                    }
                    None
                }
            });

        Ok(iter)
    }

    /// Check if a directory entry should be pruned
    fn should_skip_entry(&self, entry: &DirEntry) -> bool {
        entry.depth() > 0 && self.options.exclusions.matches_name(entry.file_name())
    }
}
