//! Persisted per-target sync state.
//!
//! One `sync-status.json` lives at the root of every target tree. It maps each
//! relative path to the fingerprint of its source file at the last check. The
//! state is loaded once at the start of an operation, passed by `&mut` through
//! the classifier, and written back once at the end.
//!
//! Loading never fails: a missing file yields an empty state, and an
//! unreadable or malformed one is logged and replaced by an empty state.
//! Saving is best effort; the caller decides what to do with a
//! [`SyncError::WriteFailure`].

use crate::errors::SyncError;
use chrono::{Local, SecondsFormat};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Version written into freshly bootstrapped state files
pub const STATE_FORMAT_VERSION: &str = "1.0";

/// Last observation of one source file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Source content fingerprint at last observation
    #[serde(rename = "original_hash")]
    pub source_fingerprint: String,
    /// Source modification time (RFC 3339), `null` when unknown
    #[serde(rename = "original_modified", default)]
    pub source_modified_at: Option<String>,
    /// Whether the target still has to catch up with this fingerprint
    #[serde(default = "default_needs_update")]
    pub needs_update: bool,
}

/// Sync state of one target tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncState {
    /// Time of the most recent scan (RFC 3339)
    #[serde(rename = "last_sync_check", default = "now_rfc3339")]
    pub last_checked_at: String,
    /// Source tree this state is bound to, as written by the user or bootstrap
    #[serde(rename = "original_path", default)]
    pub source_root: String,
    /// Records keyed by `/`-separated relative path
    #[serde(rename = "sync_status", default)]
    pub records: BTreeMap<String, FileRecord>,
    /// When bootstrap created the target tree
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_date: Option<String>,
    /// State format version written by bootstrap
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Free-form notes for maintainers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Fields written by other tools, carried through untouched
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl SyncState {
    /// Create an empty state bound to a source tree
    #[must_use]
    pub fn new(source_root: impl Into<String>) -> Self {
        Self {
            last_checked_at: now_rfc3339(),
            source_root: source_root.into(),
            records: BTreeMap::new(),
            created_date: None,
            version: None,
            notes: None,
            extra: serde_json::Map::new(),
        }
    }

    /// Create the initial state of a freshly bootstrapped target tree
    #[must_use]
    pub fn new_bootstrap(source_root: impl Into<String>, notes: impl Into<String>) -> Self {
        let mut state = Self::new(source_root);
        state.created_date = Some(now_rfc3339());
        state.version = Some(STATE_FORMAT_VERSION.to_string());
        state.notes = Some(notes.into());
        state
    }

    /// Load the state stored at `path`.
    ///
    /// Missing file: fresh state bound to `source_root`. Unreadable or
    /// malformed file: logged, then a fresh state.
    #[must_use]
    pub fn load(path: &Path, source_root: &str) -> Self {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No sync state yet, starting fresh");
            return Self::new(source_root);
        }

        match Self::read(path) {
            Ok(state) => {
                tracing::debug!(
                    path = %path.display(),
                    records = state.records.len(),
                    "Loaded sync state"
                );
                state
            }
            Err(e) => {
                tracing::warn!("{e}");
                Self::new(source_root)
            }
        }
    }

    /// Read the `original_path` of a stored state without logging on failure
    #[must_use]
    pub fn peek_source_root(path: &Path) -> Option<String> {
        Self::read(path)
            .ok()
            .map(|state| state.source_root)
            .filter(|root| !root.is_empty())
    }

    /// Parse the state file strictly
    fn read(path: &Path) -> Result<Self, SyncError> {
        let data = std::fs::read(path).map_err(|e| SyncError::malformed(path, e))?;
        serde_json::from_slice(&data).map_err(|e| SyncError::malformed(path, e))
    }

    /// Refresh `last_checked_at` and overwrite the state file at `path`.
    ///
    /// The file is written to a temporary sibling and renamed over the old one,
    /// so a failed save leaves the previous state intact.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::WriteFailure`] if serialization, the write or the
    /// rename fails.
    pub fn save(&mut self, path: &Path) -> Result<(), SyncError> {
        self.last_checked_at = now_rfc3339();

        let mut json =
            serde_json::to_string_pretty(self).map_err(|e| SyncError::write_failure(path, e))?;
        json.push('\n');

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let mut tmp =
            NamedTempFile::new_in(&dir).map_err(|e| SyncError::write_failure(path, e))?;
        tmp.write_all(json.as_bytes())
            .map_err(|e| SyncError::write_failure(path, e))?;
        tmp.persist(path)
            .map_err(|e| SyncError::write_failure(path, e.error))?;

        tracing::debug!(path = %path.display(), records = self.records.len(), "Saved sync state");
        Ok(())
    }

    /// Insert or overwrite the record for one path. Every other record is left
    /// as it is, so runs that touch a subset of the tree never lose history.
    pub fn record(&mut self, relative_path: &str, record: FileRecord) {
        self.records.insert(relative_path.to_string(), record);
    }

    /// Look up the record for a path
    #[must_use]
    pub fn get(&self, relative_path: &str) -> Option<&FileRecord> {
        self.records.get(relative_path)
    }

    /// Number of tracked paths
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether nothing has been recorded yet
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Location of the state file for a target tree
#[must_use]
pub fn state_path(target_root: &Path, file_name: &str) -> PathBuf {
    target_root.join(file_name)
}

/// Current local time as used in the state file
#[must_use]
pub fn now_rfc3339() -> String {
    Local::now().to_rfc3339_opts(SecondsFormat::Micros, false)
}

const fn default_needs_update() -> bool {
    true
}
