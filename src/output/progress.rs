//! Inline progress display for the fingerprint pass.

use colored::Colorize;
use std::io::{self, IsTerminal, Write};

/// A counter that redraws itself in place on a TTY stderr.
///
/// Renders as `Fingerprinting: 42% (21/50)` and ends with `, done.`.
/// On a non-TTY stderr nothing is printed, so piped output stays clean.
pub struct Progress {
    /// Label before the counter
    title: String,
    total: usize,
    current: usize,
    /// Draw only when stderr is a terminal and output is not quiet
    enabled: bool,
    /// Last drawn percentage
    drawn_percent: Option<u8>,
}

impl Progress {
    /// Start a progress display for `total` items
    #[must_use]
    pub fn new(title: &str, total: usize) -> Self {
        let enabled = total > 0
            && io::stderr().is_terminal()
            && super::get_verbosity() != super::Verbosity::Quiet;

        let mut progress = Self {
            title: title.to_string(),
            total,
            current: 0,
            enabled,
            drawn_percent: None,
        };
        progress.redraw();
        progress
    }

    /// Move to `current` items done. Redraws only when the percentage changes.
    pub fn set(&mut self, current: usize) {
        self.current = current.min(self.total);
        self.redraw();
    }

    /// Completion percentage, 0 for an empty run
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            0
        } else {
            (self.current as f64 / self.total as f64 * 100.0) as u8
        }
    }

    /// Print the final line and stop drawing
    pub fn finish(mut self) {
        self.current = self.total;
        if self.enabled {
            eprintln!(
                "\r{}: 100% ({}/{}), done.",
                self.title.dimmed(),
                self.total,
                self.total
            );
        }
        self.enabled = false;
    }

    fn redraw(&mut self) {
        let percent = self.percent();
        if self.drawn_percent == Some(percent) {
            return;
        }
        self.drawn_percent = Some(percent);

        if self.enabled {
            eprint!(
                "\r{}: {}% ({}/{})",
                self.title.dimmed(),
                percent,
                self.current,
                self.total
            );
            let _ = io::stderr().flush();
        }
    }
}

impl Drop for Progress {
    fn drop(&mut self) {
        // Leave the cursor on a fresh line if the run stopped early
        if self.enabled {
            eprintln!();
        }
    }
}
