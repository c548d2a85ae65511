//! Seeding of brand-new locale trees.
//!
//! A locale tree for `02-samples` is created next to it as `02-samples-ja`
//! (with the default `ja` suffix). Setup copies the maintenance material of an
//! existing template locale tree, writes an initial state file, copies the
//! source content and replaces the README with a stub that carries the
//! `<!-- Original: ... -->` header marker.

use crate::config::{BootstrapConfig, Config};
use crate::errors::SyncError;
use crate::mirror::copy_preserving_mtime;
use crate::tracking::scanner::{EntryKind, ScanOptions, TreeScanner};
use crate::tracking::state::{SyncState, state_path};
use crate::utils::ExclusionSet;
use crate::utils::paths::join_key;
use anyhow::{Context, Result};
use chrono::Local;
use std::fs;
use std::path::{Path, PathBuf};

/// A top-level directory that could get a locale tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleCandidate {
    /// Source directory name, e.g. `02-samples`
    pub source_name: String,
    /// Locale directory name, e.g. `02-samples-ja`
    pub target_name: String,
    /// Whether the locale directory already exists
    pub exists: bool,
}

/// What one setup run produced
#[derive(Debug, Clone, Default)]
pub struct SetupSummary {
    /// Source directory name
    pub source_name: String,
    /// Locale directory that was created
    pub target_dir: PathBuf,
    /// Maintenance directories and documents copied from the template
    pub maintenance_items: Vec<String>,
    /// Source files copied into the new tree
    pub copied_files: usize,
}

/// Result of [`Bootstrapper::setup_all`]
#[derive(Debug, Default)]
pub struct BatchSummary {
    /// Directories set up successfully
    pub completed: Vec<SetupSummary>,
    /// Directory name and failure message
    pub failed: Vec<(String, String)>,
}

/// Creates locale trees under one base directory
pub struct Bootstrapper {
    base_dir: PathBuf,
    config: BootstrapConfig,
    state_file: String,
    content_exclusions: ExclusionSet,
    max_depth: usize,
}

impl Bootstrapper {
    /// Create a bootstrapper for the directories under `base_dir`
    #[must_use]
    pub fn new(base_dir: impl Into<PathBuf>, config: &Config) -> Self {
        let mut content_exclusions = ExclusionSet::new(&config.tracking.exclude);
        for item in &config.bootstrap.maintenance_dirs {
            content_exclusions.insert(item);
        }
        content_exclusions.insert(&config.bootstrap.maintenance_doc);
        content_exclusions.insert(&config.paths.state_file);

        Self {
            base_dir: base_dir.into(),
            config: config.bootstrap.clone(),
            state_file: config.paths.state_file.clone(),
            content_exclusions,
            max_depth: config.tracking.max_depth,
        }
    }

    /// Name of the locale tree for a source directory
    #[must_use]
    pub fn target_name(&self, source_name: &str) -> String {
        format!("{source_name}-{}", self.config.locale_suffix)
    }

    /// Top-level directories that are not localized yet, sorted by name.
    ///
    /// Hidden directories, locale trees and configured skip directories are
    /// left out.
    ///
    /// # Errors
    ///
    /// Returns an error if the base directory cannot be listed.
    pub fn available_directories(&self) -> Result<Vec<LocaleCandidate>> {
        let locale_ending = format!("-{}", self.config.locale_suffix);
        let entries = fs::read_dir(&self.base_dir)
            .with_context(|| format!("Failed to list {}", self.base_dir.display()))?;

        let mut candidates = Vec::new();
        for entry in entries {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with('.')
                || name.ends_with(&locale_ending)
                || self.config.skip_dirs.contains(&name)
            {
                continue;
            }

            let target_name = self.target_name(&name);
            candidates.push(LocaleCandidate {
                exists: self.base_dir.join(&target_name).exists(),
                source_name: name,
                target_name,
            });
        }

        candidates.sort_by(|a, b| a.source_name.cmp(&b.source_name));
        Ok(candidates)
    }

    /// Create the locale tree for one source directory.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::SourceRootMissing`] if the source directory does
    /// not exist, and an error if the locale tree already exists or any
    /// write fails.
    pub fn setup_directory(&self, source_name: &str) -> Result<SetupSummary> {
        let source_dir = self.base_dir.join(source_name);
        let target_name = self.target_name(source_name);
        let target_dir = self.base_dir.join(&target_name);

        let span = tracing::info_span!("setup", source = source_name, target = %target_name);
        let _guard = span.enter();

        if !source_dir.is_dir() {
            return Err(SyncError::SourceRootMissing(source_dir).into());
        }
        if target_dir.exists() {
            anyhow::bail!(
                "{} already exists; use `locsync sync` to update it",
                target_dir.display()
            );
        }

        fs::create_dir_all(&target_dir)
            .with_context(|| format!("Failed to create {}", target_dir.display()))?;

        let mut summary = SetupSummary {
            source_name: source_name.to_string(),
            target_dir: target_dir.clone(),
            ..SetupSummary::default()
        };

        self.copy_maintenance(source_name, &target_dir, &mut summary)?;

        let notes = format!("Created by initial setup. Localized copy of {source_name}.");
        let mut state = SyncState::new_bootstrap(format!("../{source_name}"), notes);
        state.save(&state_path(&target_dir, &self.state_file))?;

        summary.copied_files = self.copy_content(&source_dir, &target_dir)?;
        self.write_readme(source_name, &target_dir)?;

        tracing::info!(
            copied = summary.copied_files,
            maintenance = summary.maintenance_items.len(),
            "Locale tree created"
        );
        Ok(summary)
    }

    /// Set up every candidate whose locale tree does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns an error only if the base directory cannot be listed.
    /// Per-directory failures are collected in [`BatchSummary::failed`].
    pub fn setup_all(&self) -> Result<BatchSummary> {
        let mut batch = BatchSummary::default();

        for candidate in self.available_directories()? {
            if candidate.exists {
                tracing::debug!(dir = %candidate.target_name, "Already set up");
                continue;
            }
            match self.setup_directory(&candidate.source_name) {
                Ok(summary) => batch.completed.push(summary),
                Err(e) => {
                    tracing::warn!(dir = %candidate.source_name, error = %e, "Setup failed");
                    batch.failed.push((candidate.source_name, format!("{e:#}")));
                }
            }
        }

        Ok(batch)
    }

    /// Copy maintenance directories and the maintenance document from the
    /// template locale tree. A missing template is logged and skipped.
    fn copy_maintenance(
        &self,
        source_name: &str,
        target_dir: &Path,
        summary: &mut SetupSummary,
    ) -> Result<()> {
        let template = self.base_dir.join(&self.config.template_dir);
        if !template.is_dir() {
            tracing::warn!(template = %template.display(), "Template locale tree not found, skipping maintenance files");
            return Ok(());
        }

        for dir in &self.config.maintenance_dirs {
            let from = template.join(dir);
            if from.is_dir() {
                self.copy_tree(&from, &target_dir.join(dir), &ExclusionSet::default())?;
                summary.maintenance_items.push(dir.clone());
            }
        }

        let doc = template.join(&self.config.maintenance_doc);
        if doc.is_file() {
            let content = fs::read_to_string(&doc)
                .with_context(|| format!("Failed to read {}", doc.display()))?;
            let content = rewrite_source_reference(&content, self.template_source(), source_name);
            fs::write(target_dir.join(&self.config.maintenance_doc), content)
                .context("Failed to write maintenance document")?;
            summary.maintenance_items.push(self.config.maintenance_doc.clone());
        }

        Ok(())
    }

    /// Source directory the template tree was made from
    fn template_source(&self) -> &str {
        let locale_ending = format!("-{}", self.config.locale_suffix);
        self.config
            .template_dir
            .strip_suffix(&locale_ending)
            .unwrap_or(&self.config.template_dir)
    }

    fn copy_content(&self, source_dir: &Path, target_dir: &Path) -> Result<usize> {
        self.copy_tree(source_dir, target_dir, &self.content_exclusions)
    }

    /// Copy a tree, pruning excluded components. Returns the number of files copied.
    fn copy_tree(&self, from: &Path, to: &Path, exclusions: &ExclusionSet) -> Result<usize> {
        let options = ScanOptions {
            extensions: std::collections::HashSet::new(),
            exclusions: exclusions.clone(),
            follow_symlinks: false,
            max_depth: self.max_depth,
        };

        fs::create_dir_all(to).with_context(|| format!("Failed to create {}", to.display()))?;

        let mut copied = 0;
        for entry in TreeScanner::new(from, options).scan_entries()? {
            let dest = join_key(to, &entry.relative_path);
            match entry.kind {
                EntryKind::Directory => {
                    fs::create_dir_all(&dest)
                        .with_context(|| format!("Failed to create {}", dest.display()))?;
                }
                EntryKind::File => {
                    copy_preserving_mtime(&join_key(from, &entry.relative_path), &dest)?;
                    copied += 1;
                }
            }
        }
        Ok(copied)
    }

    /// Replace the README copied from the source with a localized stub
    fn write_readme(&self, source_name: &str, target_dir: &Path) -> Result<()> {
        let readme = target_dir.join("README.md");
        let content = readme_stub(
            source_name,
            &self.target_name(source_name),
            &self.config.locale_suffix,
        );
        fs::write(&readme, content)
            .with_context(|| format!("Failed to write {}", readme.display()))
    }
}

/// Point a template document at a different source directory
fn rewrite_source_reference(content: &str, template_source: &str, source_name: &str) -> String {
    content.replace(&format!("../{template_source}"), &format!("../{source_name}"))
}

/// `01-getting-started` -> `01 Getting Started`
fn display_title(name: &str) -> String {
    name.split('-')
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn readme_stub(source_name: &str, target_name: &str, suffix: &str) -> String {
    format!(
        "<!-- Original: ../{source_name}/README.md -->
<!-- Last synced: {date} -->

# {title} ({suffix})

This directory is the `{suffix}` localization of [{source_name}](../{source_name}).

## Maintenance

Check which files changed upstream:

```bash
cd {target_name}
locsync check
```

Show translation progress:

```bash
locsync status --format table
```

Mirror new files and directories:

```bash
locsync sync
```
",
        date = Local::now().format("%Y-%m-%d"),
        title = display_title(source_name),
    )
}
