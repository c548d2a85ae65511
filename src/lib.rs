#![warn(missing_docs)]
// Allow pedantic strict lints that create false positives in this codebase
#![allow(clippy::arithmetic_side_effects)] // Counters over file lists cannot overflow
#![allow(clippy::float_arithmetic)] // Progress percentages
#![allow(clippy::indexing_slicing)] // Bounds checked by logic

//! # locsync - Locale Mirror and Staleness Tracker
//!
//! locsync keeps localized copies of a documentation tree in step with the
//! canonical tree they were translated from. It never translates and never
//! merges content: it tells a human which files fell behind and mirrors new
//! structure so nothing is forgotten.
//!
//! ## Features
//!
//! - **Content Fingerprints**: Source files are hashed with xxHash3 and compared
//!   against the fingerprints recorded at the last check
//! - **Persistent State**: A `sync-status.json` at the target root survives
//!   partial runs and foreign edits
//! - **Non-Destructive Mirroring**: New directories and files are copied over,
//!   removed ones are only reported
//! - **Translation Progress**: A pluggable detector decides which target files
//!   already look localized
//!
//! ## Architecture
//!
//! - [`tracking`]: Scanner, fingerprint state, classifier and translation analysis
//! - [`mirror`]: Additive structure synchronization
//! - [`bootstrap`]: Seeding of new locale trees
//! - [`commands`]: CLI command implementations
//! - [`config`]: Configuration loading and validation
//! - [`output`]: Terminal output and progress display
//! - [`utils`]: Hashing, path and formatting helpers
//!
//! ## Example Usage
//!
//! ```no_run
//! use locsync::LocsyncContext;
//! use std::path::Path;
//!
//! # fn main() -> anyhow::Result<()> {
//! let ctx = LocsyncContext::new(Path::new("01-tutorials-ja"), None)?;
//! let outcome = locsync::commands::check::execute(&ctx)?;
//! std::process::exit(outcome.exit_code());
//! # }
//! ```

/// Seeding of new locale trees from a template.
pub mod bootstrap;

/// Command-line interface definitions (argument parsing structures).
pub mod cli;

/// Commands module containing all CLI command implementations.
pub mod commands;

/// Configuration parsing, validation, and management.
pub mod config;

/// Categorized synchronization errors.
pub mod errors;

/// Additive structure synchronization from source to target.
pub mod mirror;

/// Output formatting and progress display.
pub mod output;

/// Staleness tracking between a source tree and its localized copy.
pub mod tracking;

/// Utility functions and helpers.
pub mod utils;

#[cfg(test)]
mod test_utils;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::errors::SyncError;
use crate::tracking::markers::MarkerDetector;
use crate::tracking::scanner::ScanOptions;
use crate::tracking::state::SyncState;
use crate::utils::paths::{expand_tilde, resolve_against};

/// Current version of the locsync binary.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default name of the state file at the root of every target tree.
pub const DEFAULT_STATE_FILE: &str = "sync-status.json";

/// Default name of the per-target configuration file.
pub const DEFAULT_CONFIG_FILE: &str = "locsync.toml";

/// Central context for all locsync operations.
///
/// Holds the resolved pair of roots and the configuration that applies to
/// them. The source root is resolved in this order:
///
/// 1. an explicit path (the `--source` flag), relative to the working directory
/// 2. `paths.source` from the configuration, relative to the target root
/// 3. `original_path` from an existing state file, relative to the target root
/// 4. a sibling named like the target without its locale suffix
///    (`01-tutorials-ja` -> `../01-tutorials`)
///
/// # Examples
///
/// ```no_run
/// use locsync::LocsyncContext;
/// use std::path::Path;
///
/// # fn main() -> anyhow::Result<()> {
/// let ctx = LocsyncContext::new(Path::new("."), Some(Path::new("../01-tutorials")))?;
/// println!("{} -> {}", ctx.source_root.display(), ctx.target_root.display());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct LocsyncContext {
    /// Localized tree being maintained.
    pub target_root: PathBuf,

    /// Canonical tree the target follows.
    pub source_root: PathBuf,

    /// Loaded configuration settings.
    pub config: config::Config,

    /// Configuration file in use, if any.
    pub config_path: Option<PathBuf>,
}

impl LocsyncContext {
    /// Creates a context for a target tree.
    ///
    /// # Errors
    ///
    /// Returns an error if a configuration file exists but is invalid, or if
    /// no source root can be determined.
    pub fn new(target: &Path, source: Option<&Path>) -> Result<Self> {
        let target_root = absolute_root(&expand_tilde(target)?)?;
        let (config, config_path) = config::Config::discover(&target_root)?;

        let source_root = match source {
            Some(explicit) => absolute_root(&expand_tilde(explicit)?)?,
            None => Self::infer_source(&target_root, &config)?,
        };

        tracing::debug!(
            source = %source_root.display(),
            target = %target_root.display(),
            config = ?config_path,
            "Resolved roots"
        );

        Ok(Self {
            target_root,
            source_root,
            config,
            config_path,
        })
    }

    /// Creates a context with explicit roots and configuration.
    #[must_use]
    pub fn new_explicit(target_root: PathBuf, source_root: PathBuf, config: config::Config) -> Self {
        Self {
            target_root,
            source_root,
            config,
            config_path: None,
        }
    }

    fn infer_source(target_root: &Path, config: &config::Config) -> Result<PathBuf> {
        if let Some(configured) = &config.paths.source {
            return absolute_root(&resolve_against(target_root, configured)?);
        }

        let state_file = tracking::state::state_path(target_root, &config.paths.state_file);
        if let Some(stored) = SyncState::peek_source_root(&state_file) {
            return absolute_root(&resolve_against(target_root, Path::new(&stored))?);
        }

        let name = target_root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .context("Cannot infer the source tree of a root directory; pass --source")?;
        let suffix = format!("-{}", config.bootstrap.locale_suffix);
        let source_name = name.strip_suffix(&suffix).with_context(|| {
            format!("Cannot infer the source tree of {name} (no `{suffix}` suffix); pass --source")
        })?;

        Ok(target_root
            .parent()
            .map_or_else(|| PathBuf::from(source_name), |parent| parent.join(source_name)))
    }

    /// Location of the state file.
    #[must_use]
    pub fn state_path(&self) -> PathBuf {
        tracking::state::state_path(&self.target_root, &self.config.paths.state_file)
    }

    /// Scan options built from the configuration.
    #[must_use]
    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions::from_config(&self.config)
    }

    /// Localization detector built from the configuration.
    #[must_use]
    pub fn detector(&self) -> MarkerDetector {
        MarkerDetector::from_config(&self.config.markers)
    }

    /// Source root as written into a fresh state file: `../<name>` for
    /// sibling trees, otherwise the full path.
    #[must_use]
    pub fn stored_source_root(&self) -> String {
        match (
            self.source_root.parent(),
            self.target_root.parent(),
            self.source_root.file_name(),
        ) {
            (Some(a), Some(b), Some(name)) if a == b => {
                format!("../{}", name.to_string_lossy())
            }
            _ => self.source_root.display().to_string(),
        }
    }

    /// Fail with [`SyncError::SourceRootMissing`] unless the source root is a directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the source root does not exist.
    pub fn check_source_exists(&self) -> Result<()> {
        if !self.source_root.is_dir() {
            return Err(SyncError::SourceRootMissing(self.source_root.clone()).into());
        }
        Ok(())
    }
}

/// Canonical form of an existing root, or an absolute form of a missing one
fn absolute_root(path: &Path) -> Result<PathBuf> {
    match std::fs::canonicalize(path) {
        Ok(canonical) => Ok(canonical),
        Err(_) => std::path::absolute(path)
            .with_context(|| format!("Cannot resolve {}", path.display())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs;

    #[test]
    #[serial]
    fn test_infers_sibling_source() -> Result<()> {
        let base = tempfile::tempdir()?;
        fs::create_dir_all(base.path().join("01-tutorials"))?;
        fs::create_dir_all(base.path().join("01-tutorials-ja"))?;

        let ctx = LocsyncContext::new(&base.path().join("01-tutorials-ja"), None)?;
        assert_eq!(ctx.source_root.file_name().unwrap(), "01-tutorials");
        assert_eq!(ctx.stored_source_root(), "../01-tutorials");
        assert!(ctx.config_path.is_none());
        ctx.check_source_exists()?;
        Ok(())
    }

    #[test]
    #[serial]
    fn test_state_file_source_wins_over_name() -> Result<()> {
        let base = tempfile::tempdir()?;
        let target = base.path().join("docs-ja");
        fs::create_dir_all(base.path().join("content"))?;
        fs::create_dir_all(&target)?;
        fs::write(
            target.join(DEFAULT_STATE_FILE),
            r#"{"original_path": "../content", "sync_status": {}}"#,
        )?;

        let ctx = LocsyncContext::new(&target, None)?;
        assert!(ctx.source_root.ends_with("content"));
        Ok(())
    }

    #[test]
    #[serial]
    fn test_configured_source_wins() -> Result<()> {
        let base = tempfile::tempdir()?;
        let target = base.path().join("docs-ja");
        fs::create_dir_all(&target)?;
        fs::write(
            target.join(DEFAULT_CONFIG_FILE),
            "[paths]\nsource = \"../upstream\"\n",
        )?;

        let ctx = LocsyncContext::new(&target, None)?;
        assert!(ctx.source_root.ends_with("upstream"));
        assert!(ctx.config_path.is_some());
        assert!(ctx.check_source_exists().is_err());
        Ok(())
    }

    #[test]
    #[serial]
    fn test_uninferable_source() -> Result<()> {
        let base = tempfile::tempdir()?;
        let target = base.path().join("plain");
        fs::create_dir_all(&target)?;

        assert!(LocsyncContext::new(&target, None).is_err());
        Ok(())
    }
}
