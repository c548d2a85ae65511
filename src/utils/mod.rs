//! Utility functions and helpers.
//!
//! - Content fingerprinting ([`hash`])
//! - Path manipulation and relative keys ([`paths`])
//! - Status labels and timestamp formatting ([`formatters`])
//! - Exclusion matching used to prune directory walks ([`ExclusionSet`])
//!
//! # Examples
//!
//! ```
//! use locsync::utils::ExclusionSet;
//! use std::ffi::OsStr;
//!
//! let exclusions = ExclusionSet::new(["scripts", "*.pyc"]);
//! assert!(exclusions.matches_name(OsStr::new("scripts")));
//! assert!(exclusions.matches_name(OsStr::new("cache.pyc")));
//! assert!(!exclusions.matches_name(OsStr::new("README.md")));
//! ```

/// Status labels, icons and timestamp formatting
pub mod formatters;
/// Content fingerprinting (xxHash3)
pub mod hash;
/// Path manipulation and resolution utilities
pub mod paths;

use glob::Pattern;
use std::collections::HashSet;
use std::ffi::OsStr;

/// Set of path component names that are pruned from every tree walk.
///
/// Literal names are checked with a hash lookup. Entries containing glob
/// metacharacters (`*`, `?`, `[`) are compiled to [`glob::Pattern`]s and
/// matched against the component name only, never the full path.
#[derive(Debug, Clone, Default)]
pub struct ExclusionSet {
    /// Exact component names
    names: HashSet<String>,
    /// Wildcard patterns such as `*.pyc`
    patterns: Vec<Pattern>,
}

impl ExclusionSet {
    /// Build a set from configured entries. Invalid glob patterns are logged
    /// and treated as literal names.
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::default();
        for entry in entries {
            set.insert(entry.as_ref());
        }
        set
    }

    /// Add one entry to the set
    pub fn insert(&mut self, entry: &str) {
        let entry = entry.trim().trim_end_matches('/');
        if entry.is_empty() {
            return;
        }

        if entry.contains(['*', '?', '[']) {
            match Pattern::new(entry) {
                Ok(pattern) => {
                    self.patterns.push(pattern);
                    return;
                }
                Err(e) => {
                    tracing::warn!(pattern = entry, error = %e, "Invalid exclusion pattern, matching literally");
                }
            }
        }
        self.names.insert(entry.to_string());
    }

    /// Whether a single path component is excluded
    #[must_use]
    pub fn matches_name(&self, name: &OsStr) -> bool {
        let name = name.to_string_lossy();
        self.names.contains(name.as_ref()) || self.patterns.iter().any(|p| p.matches(&name))
    }

    /// Number of entries (names and patterns)
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len() + self.patterns.len()
    }

    /// Whether the set excludes nothing
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
