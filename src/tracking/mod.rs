//! Staleness tracking between a source tree and its localized copy.
//!
//! # Architecture
//!
//! - [`scanner::TreeScanner`] - Enumerates eligible files and directories
//! - [`state::SyncState`] - Persisted fingerprints of the last check
//! - [`classifier`] - Source-side classification (`new`, `updated`, ...)
//! - [`translation`] - Target-side translation progress
//! - [`markers`] - Pluggable "looks localized" detection
//!
//! # Usage
//!
//! ```no_run
//! use locsync::tracking::classifier::check_updates;
//! use locsync::tracking::scanner::{ScanOptions, TreeScanner};
//! use locsync::tracking::state::{SyncState, state_path};
//! use std::path::Path;
//!
//! # fn main() -> anyhow::Result<()> {
//! let source = Path::new("01-tutorials");
//! let target = Path::new("01-tutorials-ja");
//! let files = TreeScanner::new(source, ScanOptions::default()).scan_files()?;
//!
//! let path = state_path(target, "sync-status.json");
//! let mut state = SyncState::load(&path, "../01-tutorials");
//! let report = check_updates(source, target, &mut state, &files);
//! state.save(&path)?;
//! println!("{} file(s) need attention", report.updates_needed.len());
//! # Ok(())
//! # }
//! ```

pub mod classifier;
pub mod markers;
pub mod scanner;
pub mod state;
pub mod translation;

pub use classifier::{UpdateReport, UpdateStatus, check_updates};
pub use markers::{LocalizationDetector, MarkerDetector, TranslationMarkers};
pub use scanner::{ScanOptions, TreeScanner};
pub use state::{FileRecord, SyncState};
pub use translation::{TranslationReport, TranslationStatus, analyze_translation_status};
