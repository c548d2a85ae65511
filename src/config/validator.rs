//! Warnings for configuration keys locsync does not know.

use anyhow::Result;
use colored::Colorize;
use std::collections::HashSet;

/// Tracks which configuration fields locsync recognizes
pub struct ConfigValidator {
    /// Set of valid configuration fields
    known_fields: HashSet<String>,
    /// Fields that used to exist and now have no effect
    deprecated_fields: HashSet<String>,
}

impl ConfigValidator {
    /// Create a new validator with known configuration fields
    #[must_use]
    pub fn new() -> Self {
        let known_fields = [
            "paths.source",
            "paths.state_file",
            "tracking.extensions",
            "tracking.exclude",
            "tracking.follow_symlinks",
            "tracking.max_depth",
            "markers.header_markers",
            "markers.note_keywords",
            "markers.sniff_bytes",
            "markers.header_window_bytes",
            "bootstrap.locale_suffix",
            "bootstrap.template_dir",
            "bootstrap.maintenance_dirs",
            "bootstrap.maintenance_doc",
            "bootstrap.skip_dirs",
        ]
        .iter()
        .map(ToString::to_string)
        .collect();

        // Extensions used to be matched with the leading dot included
        let deprecated_fields = ["tracking.translatable_extensions"]
            .iter()
            .map(ToString::to_string)
            .collect();

        Self {
            known_fields,
            deprecated_fields,
        }
    }

    /// Validate raw configuration text and warn about unknown or deprecated fields
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid TOML
    pub fn validate_config_str(&self, content: &str) -> Result<()> {
        let parsed: toml::Value = toml::from_str(content)?;

        let (unknown, deprecated) = self.collect_issues(&parsed);

        let mut warnings = Vec::new();
        for field in &unknown {
            warnings.push(format!("Unknown configuration field: {}", field.yellow()));
        }
        for field in &deprecated {
            warnings.push(format!(
                "Deprecated field '{}': {}",
                field.yellow(),
                "use tracking.extensions instead".dimmed()
            ));
        }

        if !warnings.is_empty() {
            eprintln!("{}", "Configuration warnings:".yellow().bold());
            for warning in warnings {
                eprintln!("  {warning}");
            }
            eprintln!();
        }

        Ok(())
    }

    /// Returns `(unknown, deprecated)` dotted field names found in a parsed document
    #[must_use]
    pub fn collect_issues(&self, parsed: &toml::Value) -> (Vec<String>, Vec<String>) {
        let mut unknown = Vec::new();
        let mut deprecated = Vec::new();
        self.check_table(parsed, "", &mut unknown, &mut deprecated);
        unknown.sort();
        deprecated.sort();
        (unknown, deprecated)
    }

    /// Recursively checks a TOML table for unknown and deprecated fields
    fn check_table(
        &self,
        table: &toml::Value,
        prefix: &str,
        unknown: &mut Vec<String>,
        deprecated: &mut Vec<String>,
    ) {
        let toml::Value::Table(map) = table else {
            return;
        };

        for (key, value) in map {
            let full_key = if prefix.is_empty() {
                key.clone()
            } else {
                format!("{prefix}.{key}")
            };

            if self.deprecated_fields.contains(&full_key) {
                deprecated.push(full_key);
                continue;
            }

            if self.known_fields.contains(&full_key) {
                continue;
            }

            if let toml::Value::Table(_) = value {
                self.check_table(value, &full_key, unknown, deprecated);
            } else {
                unknown.push(full_key);
            }
        }
    }
}

impl Default for ConfigValidator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_fields_pass() {
        let validator = ConfigValidator::new();
        let parsed: toml::Value = toml::from_str(
            "[paths]\nsource = \"../src\"\n[tracking]\nextensions = [\"md\"]\nmax_depth = 8\n",
        )
        .unwrap();

        let (unknown, deprecated) = validator.collect_issues(&parsed);
        assert!(unknown.is_empty());
        assert!(deprecated.is_empty());
    }

    #[test]
    fn test_unknown_and_deprecated_fields() {
        let validator = ConfigValidator::new();
        let parsed: toml::Value = toml::from_str(
            "[tracking]\ntranslatable_extensions = [\".md\"]\nfollow = true\n[extra]\nx = 1\n",
        )
        .unwrap();

        let (unknown, deprecated) = validator.collect_issues(&parsed);
        assert_eq!(unknown, vec!["extra.x", "tracking.follow"]);
        assert_eq!(deprecated, vec!["tracking.translatable_extensions"]);
    }

    #[test]
    fn test_invalid_toml_is_error() {
        let validator = ConfigValidator::new();
        assert!(validator.validate_config_str("[broken").is_err());
    }
}
