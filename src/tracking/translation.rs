//! Target-side translation progress.
//!
//! Walks the files that actually exist in the target tree and combines three
//! signals per file: whether a source counterpart still exists, what the
//! [`LocalizationDetector`] sees at the top of the file, and the
//! `needs_update` flag from the last staleness check.

use crate::tracking::markers::{LocalizationDetector, TranslationMarkers};
use crate::tracking::scanner::{ScanOptions, TreeScanner};
use crate::tracking::state::SyncState;
use crate::utils::paths::join_key;
use anyhow::Result;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::path::Path;

/// Translation state of one target file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TranslationStatus {
    /// Looks localized
    Translated,
    /// Not localized yet, source unchanged since last check
    Pending,
    /// Not localized yet, source changed or never checked
    NeedsUpdate,
    /// No source counterpart
    Orphaned,
}

impl TranslationStatus {
    /// Name used in reports and the JSON output
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Translated => "translated",
            Self::Pending => "pending",
            Self::NeedsUpdate => "needs_update",
            Self::Orphaned => "orphaned",
        }
    }

    /// Whether a translator still has work to do on this file
    #[must_use]
    pub const fn needs_translation(&self) -> bool {
        matches!(self, Self::Pending | Self::NeedsUpdate)
    }
}

/// Per-file entry of the translation report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileTranslation {
    /// `/`-separated relative path
    pub file: String,
    /// Translation status of this file
    pub status: TranslationStatus,
    /// Whether the source counterpart exists
    pub has_original: bool,
    /// Source modification time from the sync state, if recorded.
    /// Serialized as `"unknown"` when absent.
    #[serde(serialize_with = "serialize_or_unknown", deserialize_with = "deserialize_or_unknown")]
    pub original_modified: Option<String>,
    /// `needs_update` from the sync state; `true` when the file was never checked
    pub needs_update: bool,
    /// What the detector found at the top of the file
    pub translation_markers: TranslationMarkers,
}

const UNKNOWN: &str = "unknown";

fn serialize_or_unknown<S: Serializer>(value: &Option<String>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(value.as_deref().unwrap_or(UNKNOWN))
}

fn deserialize_or_unknown<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|v| v != UNKNOWN))
}

/// Translation progress of a whole target tree
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationReport {
    /// Eligible files under the target root
    pub total_files: usize,
    /// Files that look localized
    pub translated_files: usize,
    /// `pending` plus `needs_update`
    pub pending_files: usize,
    /// Files whose source is gone
    pub orphaned_files: usize,
    /// Per-file entries in scan order
    pub files: Vec<FileTranslation>,
}

impl TranslationReport {
    /// Share of translated files, 0.0 for an empty tree
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn progress_percent(&self) -> f64 {
        if self.total_files == 0 {
            0.0
        } else {
            self.translated_files as f64 / self.total_files as f64 * 100.0
        }
    }

    /// Files a translator still has to work on, sorted by path
    #[must_use]
    pub fn needing_translation(&self) -> Vec<&FileTranslation> {
        let mut files: Vec<_> = self
            .files
            .iter()
            .filter(|f| f.status.needs_translation())
            .collect();
        files.sort_by(|a, b| a.file.cmp(&b.file));
        files
    }
}

/// Analyze every eligible file under `target_root`.
///
/// # Errors
///
/// Returns an error if `target_root` is not a directory.
pub fn analyze_translation_status(
    source_root: &Path,
    target_root: &Path,
    state: &SyncState,
    options: &ScanOptions,
    detector: &dyn LocalizationDetector,
) -> Result<TranslationReport> {
    let span = tracing::info_span!("translation_status", target = %target_root.display());
    let _guard = span.enter();

    let files = TreeScanner::new(target_root, options.clone()).scan_files()?;
    let mut report = TranslationReport::default();

    for file in files {
        let has_original = join_key(source_root, &file).is_file();
        let markers = detector.inspect(&join_key(target_root, &file));
        let record = state.get(&file);
        let needs_update = record.is_none_or(|r| r.needs_update);

        let status = if !has_original {
            report.orphaned_files += 1;
            TranslationStatus::Orphaned
        } else if detector.is_localized(&markers) {
            report.translated_files += 1;
            TranslationStatus::Translated
        } else if needs_update {
            report.pending_files += 1;
            TranslationStatus::NeedsUpdate
        } else {
            report.pending_files += 1;
            TranslationStatus::Pending
        };
        tracing::debug!(file = %file, status = status.as_str(), "Translation status");

        report.total_files += 1;
        report.files.push(FileTranslation {
            file,
            status,
            has_original,
            original_modified: record.and_then(|r| r.source_modified_at.clone()),
            needs_update,
            translation_markers: markers,
        });
    }

    Ok(report)
}
