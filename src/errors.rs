use std::fmt;
use std::path::{Path, PathBuf};

/// Categorized synchronization errors with actionable guidance
///
/// Only [`SyncError::SourceRootMissing`] aborts an operation. The other
/// variants describe a single skipped item and are logged by the core while
/// the run carries on.
#[derive(Debug)]
pub enum SyncError {
    /// The source tree (or another root the operation needs) does not exist
    SourceRootMissing(PathBuf),
    /// A single file could not be read or fingerprinted
    UnreadableFile {
        /// File that failed
        path: PathBuf,
        /// Underlying reason
        reason: String,
    },
    /// The persisted state file exists but could not be parsed
    MalformedPersistedState {
        /// State file location
        path: PathBuf,
        /// Parser or I/O message
        reason: String,
    },
    /// The persisted state file could not be written
    WriteFailure {
        /// State file location
        path: PathBuf,
        /// Underlying reason
        reason: String,
    },
    /// A directory creation or file copy failed during structure sync
    ItemFailure {
        /// Target path that could not be created
        path: PathBuf,
        /// Underlying reason
        reason: String,
    },
}

impl SyncError {
    /// Build an [`SyncError::UnreadableFile`] from any displayable error
    pub fn unreadable(path: &Path, err: impl fmt::Display) -> Self {
        Self::UnreadableFile {
            path: path.to_path_buf(),
            reason: err.to_string(),
        }
    }

    /// Build a [`SyncError::MalformedPersistedState`] from any displayable error
    pub fn malformed(path: &Path, err: impl fmt::Display) -> Self {
        Self::MalformedPersistedState {
            path: path.to_path_buf(),
            reason: err.to_string(),
        }
    }

    /// Build a [`SyncError::WriteFailure`] from any displayable error
    pub fn write_failure(path: &Path, err: impl fmt::Display) -> Self {
        Self::WriteFailure {
            path: path.to_path_buf(),
            reason: err.to_string(),
        }
    }

    /// Build a [`SyncError::ItemFailure`] from any displayable error
    pub fn item_failure(path: &Path, err: impl fmt::Display) -> Self {
        Self::ItemFailure {
            path: path.to_path_buf(),
            reason: format!("{err:#}"),
        }
    }

    /// Get a user-friendly error message with suggestions
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::SourceRootMissing(path) => format!(
                "Source directory not found: {}\n\nSuggestions:\n\
                 - Pass the source tree explicitly with --source\n\
                 - Set paths.source in locsync.toml\n\
                 - Check original_path in the target's sync-status.json",
                path.display()
            ),
            Self::UnreadableFile { path, reason } => {
                format!("Cannot read {}: {reason} (skipped)", path.display())
            }
            Self::MalformedPersistedState { path, reason } => format!(
                "Ignoring unreadable sync state {}: {reason}\n\
                 A fresh state will be written at the end of this run.",
                path.display()
            ),
            Self::WriteFailure { path, reason } => format!(
                "Failed to save sync state {}: {reason}\n\n\
                 Results above are still valid; the next run will re-check every file.",
                path.display()
            ),
            Self::ItemFailure { path, reason } => {
                format!("Failed to create {}: {reason}", path.display())
            }
        }
    }

    /// Get a short description of the error type
    #[must_use]
    pub const fn error_type(&self) -> &'static str {
        match self {
            Self::SourceRootMissing(_) => "Source Root Missing",
            Self::UnreadableFile { .. } => "Unreadable File",
            Self::MalformedPersistedState { .. } => "Malformed State",
            Self::WriteFailure { .. } => "Write Failure",
            Self::ItemFailure { .. } => "Item Failure",
        }
    }
}

impl fmt::Display for SyncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.user_message())
    }
}

impl std::error::Error for SyncError {}
