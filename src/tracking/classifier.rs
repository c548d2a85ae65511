//! Staleness classification of source files against a target tree.
//!
//! For every eligible source path the classifier decides whether the target
//! is missing the file (`new`), has never been checked against it
//! (`not_tracked`), has fallen behind a changed source (`updated`), or is
//! current. Fresh fingerprints are written into the in-memory [`SyncState`];
//! saving it is the caller's job.

use crate::errors::SyncError;
use crate::tracking::state::{FileRecord, SyncState};
use crate::utils::hash::fingerprint_file;
use crate::utils::paths::{entry_exists, join_key, modified_at};
use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Lifecycle state of a source file relative to the target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateStatus {
    /// Exists in source, absent in target
    #[serde(rename = "new_file")]
    New,
    /// Exists in both, source fingerprint changed since the last check
    Updated,
    /// Exists in both, never checked before
    NotTracked,
    /// Exists in both, fingerprint unchanged
    Current,
}

impl UpdateStatus {
    /// Name used in reports and the JSON output
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new_file",
            Self::Updated => "updated",
            Self::NotTracked => "not_tracked",
            Self::Current => "current",
        }
    }
}

/// One file that needs attention
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateItem {
    /// `/`-separated relative path
    pub file: String,
    /// Absolute or caller-relative source location
    pub source_path: PathBuf,
    /// Corresponding target location
    pub target_path: PathBuf,
    /// Classification of this file
    pub status: UpdateStatus,
    /// Source modification time (RFC 3339), if known
    pub source_modified: Option<String>,
}

/// Result of one staleness check
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateReport {
    /// Source files with no target counterpart
    pub new_files: Vec<UpdateItem>,
    /// `updated` and `not_tracked` files
    pub updates_needed: Vec<UpdateItem>,
    /// Files whose fingerprint did not change
    pub up_to_date: usize,
    /// Files skipped because they could not be read
    pub skipped: Vec<String>,
    /// Number of source files considered
    pub total_files: usize,
}

impl UpdateReport {
    /// Whether anything is pending. Automation treats `true` as a failing check.
    #[must_use]
    pub fn has_changes(&self) -> bool {
        !self.new_files.is_empty() || !self.updates_needed.is_empty()
    }

    /// Items of one status, in scan order
    pub fn with_status(&self, status: UpdateStatus) -> impl Iterator<Item = &UpdateItem> {
        self.new_files
            .iter()
            .chain(&self.updates_needed)
            .filter(move |item| item.status == status)
    }
}

/// Classify every source path and refresh the state records.
///
/// Unreadable source files are logged and listed in
/// [`UpdateReport::skipped`]; they never abort the check.
pub fn check_updates(
    source_root: &Path,
    target_root: &Path,
    state: &mut SyncState,
    files: &[String],
) -> UpdateReport {
    check_updates_with_progress(source_root, target_root, state, files, |_| {})
}

/// Same as [`check_updates`], calling `on_progress` with the number of files
/// processed so far
pub fn check_updates_with_progress<F>(
    source_root: &Path,
    target_root: &Path,
    state: &mut SyncState,
    files: &[String],
    mut on_progress: F,
) -> UpdateReport
where
    F: FnMut(usize),
{
    let span = tracing::info_span!(
        "check_updates",
        source = %source_root.display(),
        target = %target_root.display()
    );
    let _guard = span.enter();

    let mut report = UpdateReport {
        total_files: files.len(),
        ..UpdateReport::default()
    };

    for (done, file) in files.iter().enumerate() {
        let source_path = join_key(source_root, file);
        let target_path = join_key(target_root, file);

        match fingerprint_file(&source_path) {
            Ok(fingerprint) => {
                classify_one(file, source_path, target_path, fingerprint, state, &mut report);
            }
            Err(e) => {
                tracing::warn!("{}", SyncError::unreadable(&source_path, format!("{e:#}")));
                report.skipped.push(file.clone());
            }
        }

        on_progress(done + 1);
    }

    tracing::info!(
        total = report.total_files,
        new = report.new_files.len(),
        updates = report.updates_needed.len(),
        up_to_date = report.up_to_date,
        skipped = report.skipped.len(),
        "Staleness check finished"
    );

    report
}

/// Classify a single readable source file and update its record
fn classify_one(
    file: &str,
    source_path: PathBuf,
    target_path: PathBuf,
    fingerprint: String,
    state: &mut SyncState,
    report: &mut UpdateReport,
) {
    let source_modified =
        modified_at(&source_path).map(|t| t.to_rfc3339_opts(SecondsFormat::Micros, false));

    // A file only becomes tracked once the target has a counterpart
    if !entry_exists(&target_path) {
        tracing::debug!(file, "New in source");
        report.new_files.push(UpdateItem {
            file: file.to_string(),
            source_path,
            target_path,
            status: UpdateStatus::New,
            source_modified,
        });
        return;
    }

    let status = match state.get(file) {
        None => UpdateStatus::NotTracked,
        Some(record) if record.source_fingerprint != fingerprint => UpdateStatus::Updated,
        Some(_) => UpdateStatus::Current,
    };
    tracing::debug!(file, status = status.as_str(), "Classified");

    let needs_update = status != UpdateStatus::Current;
    state.record(
        file,
        FileRecord {
            source_fingerprint: fingerprint,
            source_modified_at: source_modified.clone(),
            needs_update,
        },
    );

    if needs_update {
        report.updates_needed.push(UpdateItem {
            file: file.to_string(),
            source_path,
            target_path,
            status,
            source_modified,
        });
    } else {
        report.up_to_date += 1;
    }
}
