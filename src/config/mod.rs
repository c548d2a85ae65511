//! Configuration for one target tree, read from `locsync.toml`.

/// Unknown-key warnings for configuration files
pub mod validator;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable that points at an explicit configuration file.
pub const CONFIG_PATH_ENV: &str = "LOCSYNC_CONFIG_PATH";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Where the source tree and the state file live
    #[serde(default)]
    pub paths: PathsConfig,

    /// What gets scanned, fingerprinted and mirrored
    #[serde(default)]
    pub tracking: TrackingConfig,

    /// Heuristics for spotting already-localized target files
    #[serde(default)]
    pub markers: MarkersConfig,

    /// Seeding of brand-new locale trees
    #[serde(default)]
    pub bootstrap: BootstrapConfig,
}

/// `[paths]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Source tree, relative to the target root unless absolute
    #[serde(default)]
    pub source: Option<PathBuf>,
    /// State file name at the target root
    #[serde(default = "default_state_file")]
    pub state_file: String,
}

/// `[tracking]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackingConfig {
    /// Eligible file extensions, without the leading dot
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
    /// Path components pruned from every walk (names or globs)
    #[serde(default = "default_exclude")]
    pub exclude: Vec<String>,
    /// Follow symbolic links while walking
    #[serde(default)]
    pub follow_symlinks: bool,
    /// Deepest level a walk descends to
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

/// `[markers]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkersConfig {
    /// Explicit "translated from" headers
    #[serde(default = "default_header_markers")]
    pub header_markers: Vec<String>,
    /// Words that suggest a translation note
    #[serde(default = "default_note_keywords")]
    pub note_keywords: Vec<String>,
    /// Leading bytes checked for non-ASCII text
    #[serde(default = "default_sniff_bytes")]
    pub sniff_bytes: usize,
    /// Leading bytes searched for header markers and note keywords
    #[serde(default = "default_header_window_bytes")]
    pub header_window_bytes: usize,
}

/// `[bootstrap]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BootstrapConfig {
    /// Suffix appended to the source directory name, e.g. `ja` for `01-tutorials-ja`
    #[serde(default = "default_locale_suffix")]
    pub locale_suffix: String,
    /// Existing locale tree whose maintenance files seed new ones
    #[serde(default = "default_template_dir")]
    pub template_dir: String,
    /// Template directories copied into every new tree
    #[serde(default = "default_maintenance_dirs")]
    pub maintenance_dirs: Vec<String>,
    /// Maintenance guide copied from the template with its source reference rewritten
    #[serde(default = "default_maintenance_doc")]
    pub maintenance_doc: String,
    /// Top-level directories that are never offered for localization
    #[serde(default = "default_skip_dirs")]
    pub skip_dirs: Vec<String>,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            source: None,
            state_file: default_state_file(),
        }
    }
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
            exclude: default_exclude(),
            follow_symlinks: false,
            max_depth: default_max_depth(),
        }
    }
}

impl Default for MarkersConfig {
    fn default() -> Self {
        Self {
            header_markers: default_header_markers(),
            note_keywords: default_note_keywords(),
            sniff_bytes: default_sniff_bytes(),
            header_window_bytes: default_header_window_bytes(),
        }
    }
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            locale_suffix: default_locale_suffix(),
            template_dir: default_template_dir(),
            maintenance_dirs: default_maintenance_dirs(),
            maintenance_doc: default_maintenance_doc(),
            skip_dirs: default_skip_dirs(),
        }
    }
}

impl Config {
    /// Locate and load the configuration for a target tree.
    ///
    /// Lookup order: `$LOCSYNC_CONFIG_PATH`, then `<target_root>/locsync.toml`,
    /// then built-in defaults. A missing file is never created.
    ///
    /// # Errors
    ///
    /// Returns an error if a configuration file exists but cannot be read,
    /// parsed or validated.
    pub fn discover(target_root: &Path) -> Result<(Self, Option<PathBuf>)> {
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            let path = PathBuf::from(path);
            return Ok((Self::load(&path)?, Some(path)));
        }

        let local = target_root.join(crate::DEFAULT_CONFIG_FILE);
        if local.is_file() {
            return Ok((Self::load(&local)?, Some(local)));
        }

        Ok((Self::default(), None))
    }

    /// Load configuration from a file
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Cannot read the configuration file
    /// - Configuration file contains invalid TOML
    /// - A value fails validation
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML config: {}", path.display()))?;

        config.validate()?;

        let validator = validator::ConfigValidator::new();
        if let Err(e) = validator.validate_config_str(&content) {
            tracing::warn!(path = %path.display(), error = %e, "Configuration validation failed");
        }

        Ok(config)
    }

    /// Reject values the scanner and detector cannot work with
    ///
    /// # Errors
    ///
    /// Returns an error describing the first invalid value.
    pub fn validate(&self) -> Result<()> {
        if self
            .tracking
            .extensions
            .iter()
            .any(|ext| ext.trim().trim_start_matches('.').is_empty())
        {
            anyhow::bail!("tracking.extensions must not contain empty entries");
        }

        if self.tracking.max_depth == 0 {
            anyhow::bail!("tracking.max_depth must be at least 1");
        }

        if self.markers.sniff_bytes == 0 {
            anyhow::bail!("markers.sniff_bytes must be at least 1");
        }

        if self.paths.state_file.trim().is_empty() {
            anyhow::bail!("paths.state_file must not be empty");
        }

        if self.bootstrap.locale_suffix.trim().is_empty() {
            anyhow::bail!("bootstrap.locale_suffix must not be empty");
        }

        Ok(())
    }

}

// Default functions for serde
fn default_state_file() -> String {
    crate::DEFAULT_STATE_FILE.to_string()
}

fn default_extensions() -> Vec<String> {
    ["md", "ipynb", "py"].iter().map(ToString::to_string).collect()
}

fn default_exclude() -> Vec<String> {
    [
        "scripts",
        "glossary",
        crate::DEFAULT_STATE_FILE,
        "MAINTENANCE.md",
        crate::DEFAULT_CONFIG_FILE,
        ".git",
        "__pycache__",
        ".DS_Store",
        "*.pyc",
    ]
    .iter()
    .map(ToString::to_string)
    .collect()
}

const fn default_max_depth() -> usize {
    64
}

fn default_header_markers() -> Vec<String> {
    vec!["<!-- 原文:".to_string(), "<!-- Original:".to_string()]
}

fn default_note_keywords() -> Vec<String> {
    vec!["翻訳".to_string(), "Translation".to_string()]
}

const fn default_sniff_bytes() -> usize {
    1000
}

const fn default_header_window_bytes() -> usize {
    4096
}

fn default_locale_suffix() -> String {
    "ja".to_string()
}

fn default_template_dir() -> String {
    "01-tutorials-ja".to_string()
}

fn default_maintenance_dirs() -> Vec<String> {
    vec!["scripts".to_string(), "glossary".to_string()]
}

fn default_maintenance_doc() -> String {
    "MAINTENANCE.md".to_string()
}

fn default_skip_dirs() -> Vec<String> {
    vec!["_templates".to_string(), "agent-patterns".to_string()]
}
