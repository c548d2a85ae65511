//! User-facing output for the locsync CLI.
//!
//! Reports go to stdout so they can be piped; status lines, warnings and the
//! progress display go to stderr. Diagnostics for developers go through
//! `tracing` instead and are controlled by `RUST_LOG`.

mod progress;

use colored::Colorize;
use std::sync::atomic::{AtomicU8, Ordering};

pub use progress::Progress;

/// Verbosity level for output messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    /// Only reports, warnings and errors
    Quiet = 0,
    /// Default level
    Normal = 1,
    /// Also list files that need no action
    Verbose = 2,
}

/// Global verbosity setting (default: Normal).
static VERBOSITY: AtomicU8 = AtomicU8::new(1);

/// Sets the global verbosity level for all output functions.
pub fn set_verbosity(level: Verbosity) {
    VERBOSITY.store(level as u8, Ordering::Relaxed);
}

/// Gets the current global verbosity level.
pub fn get_verbosity() -> Verbosity {
    match VERBOSITY.load(Ordering::Relaxed) {
        0 => Verbosity::Quiet,
        2 => Verbosity::Verbose,
        _ => Verbosity::Normal,
    }
}

/// Whether verbose listings should be printed
#[must_use]
pub fn is_verbose() -> bool {
    get_verbosity() == Verbosity::Verbose
}

/// Prints a status line in dimmed color (respects quiet mode).
pub fn info(message: &str) {
    if get_verbosity() == Verbosity::Quiet {
        return;
    }
    eprintln!("{}", message.dimmed());
}

/// Prints a warning in bold yellow (always shown).
pub fn warning(message: &str) {
    eprintln!("{}", message.yellow().bold());
}

/// Prints an error in bold red (always shown).
pub fn error(message: &str) {
    eprintln!("{}", message.red().bold());
}

/// Prints a bold report heading to stdout
pub fn heading(title: &str) {
    println!("{}", title.bold());
}

/// Prints an aligned `label: value` line to stdout
pub fn field(label: &str, value: impl std::fmt::Display) {
    println!("  {:<22} {value}", format!("{label}:"));
}

/// Prints one indented list entry to stdout
pub fn entry(marker: &str, text: &str) {
    println!("    {marker} {text}");
}

/// Starts a progress display for a long pass.
#[must_use]
pub fn start_progress(title: &str, total: usize) -> Progress {
    Progress::new(title, total)
}
