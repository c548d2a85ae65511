//! Command-line interface definitions for locsync.
//!
//! The CLI definitions are shared between the main binary and build tools (like xtask)
//! for man page generation.
//!
//! Note: Field-level documentation is provided via clap doc comments,
//! so we allow missing_docs for this module to avoid redundant documentation.

#![allow(missing_docs)]

use crate::commands::status::StatusFormat;
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// Main CLI structure for locsync.
#[derive(Parser)]
#[command(
    name = "locsync",
    version = crate::VERSION,
    about = "Keep localized documentation trees in step with their source",
    long_about = "Tracks which files of a localized tree fell behind the source tree, \
                  mirrors new structure without deleting anything, and reports translation progress"
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Localized tree to work on
    #[arg(short, long, global = true, default_value = ".")]
    pub target: PathBuf,

    /// Source tree (default: config, then the state file, then the sibling without the locale suffix)
    #[arg(short, long, global = true)]
    pub source: Option<PathBuf>,

    /// Show verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress informational messages
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// All available commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Find target files whose source changed and record fresh fingerprints
    Check,

    /// Show translation progress of the target tree
    Status {
        #[arg(short, long, value_enum, default_value_t = StatusFormat::Summary)]
        format: StatusFormat,
    },

    /// Mirror new source directories and files into the target
    Sync {
        /// Report what would change without touching anything
        #[arg(short = 'n', long)]
        dry_run: bool,
    },

    /// Create a new locale tree next to a source directory
    Setup {
        /// Source directory name, e.g. 02-samples
        #[arg(conflicts_with_all = ["all", "list"])]
        directory: Option<String>,

        /// Set up every directory that has no locale tree yet
        #[arg(long, conflicts_with = "list")]
        all: bool,

        /// List directories that can be set up
        #[arg(long)]
        list: bool,

        /// Directory containing the source trees
        #[arg(long, default_value = ".")]
        base: PathBuf,
    },

    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}
