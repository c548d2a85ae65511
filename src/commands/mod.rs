//! CLI command implementations.

/// `locsync check`
pub mod check;
/// Shared helpers for command implementations
pub mod context;
/// `locsync setup`
pub mod setup;
/// `locsync status`
pub mod status;
/// `locsync sync`
pub mod sync;

use colored::Colorize;

/// How a command finished, for automation that gates on the exit code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing left to do
    Clean,
    /// The target has fallen behind the source
    ChangesPending,
}

impl Outcome {
    /// `0` when clean, `1` when changes are pending. Errors exit with `2`.
    #[must_use]
    pub const fn exit_code(self) -> i32 {
        match self {
            Self::Clean => 0,
            Self::ChangesPending => 1,
        }
    }

    /// Outcome of a run that did or did not find work left
    #[must_use]
    pub const fn from_changes(has_changes: bool) -> Self {
        if has_changes {
            Self::ChangesPending
        } else {
            Self::Clean
        }
    }
}

/// Print a success message with a checkmark
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

/// Print an error message to stderr
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message);
}

/// Print an informational message
pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("{} {}", "⚠".yellow().bold(), message);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(Outcome::Clean.exit_code(), 0);
        assert_eq!(Outcome::ChangesPending.exit_code(), 1);
        assert_eq!(Outcome::from_changes(true), Outcome::ChangesPending);
        assert_eq!(Outcome::from_changes(false), Outcome::Clean);
    }
}
