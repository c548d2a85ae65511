use crate::bootstrap::{Bootstrapper, LocaleCandidate, SetupSummary};
use crate::commands::{Outcome, print_error, print_info, print_success};
use crate::config::Config;
use crate::output;
use anyhow::Result;
use colored::Colorize;
use std::path::Path;

/// What `locsync setup` was asked to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetupAction {
    /// List candidate directories
    List,
    /// Set up every candidate without a locale tree
    All,
    /// Set up one source directory
    One(String),
}

/// Create locale trees under `base_dir`.
///
/// # Errors
///
/// Returns an error if `base_dir` cannot be listed or any requested setup
/// fails.
pub fn execute(base_dir: &Path, config: &Config, action: &SetupAction) -> Result<Outcome> {
    let bootstrapper = Bootstrapper::new(base_dir, config);

    match action {
        SetupAction::List => {
            print_candidates(&bootstrapper.available_directories()?);
            Ok(Outcome::Clean)
        }
        SetupAction::All => {
            let candidates = bootstrapper.available_directories()?;
            print_candidates(&candidates);
            println!();

            let batch = bootstrapper.setup_all()?;
            for summary in &batch.completed {
                print_summary(summary);
            }
            for (dir, reason) in &batch.failed {
                print_error(&format!("{dir}: {reason}"));
            }
            print_info(&format!("Set up {} director(ies)", batch.completed.len()));

            if !batch.failed.is_empty() {
                anyhow::bail!("{} setup(s) failed", batch.failed.len());
            }
            Ok(Outcome::Clean)
        }
        SetupAction::One(dir) => {
            output::info(&format!("Setting up {}", bootstrapper.target_name(dir)));
            let summary = bootstrapper.setup_directory(dir)?;
            print_summary(&summary);
            Ok(Outcome::Clean)
        }
    }
}

fn print_candidates(candidates: &[LocaleCandidate]) {
    output::heading("Available directories:");
    if candidates.is_empty() {
        output::entry(" ", "(none)");
    }
    for candidate in candidates {
        let state = if candidate.exists {
            "exists".green()
        } else {
            "not created".yellow()
        };
        output::entry(
            "-",
            &format!("{} -> {} ({state})", candidate.source_name, candidate.target_name),
        );
    }
}

fn print_summary(summary: &SetupSummary) {
    if !summary.maintenance_items.is_empty() {
        output::info(&format!(
            "Copied maintenance files: {}",
            summary.maintenance_items.join(", ")
        ));
    }
    print_success(&format!(
        "{} ready ({} file(s) copied)",
        summary.target_dir.display(),
        summary.copied_files
    ));
}
