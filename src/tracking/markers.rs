//! Heuristics for deciding whether a target file already looks localized.
//!
//! Detection is advisory. Non-ASCII text near the top of a file is taken as a
//! sign of translation, which misfires on sources that legitimately contain
//! non-ASCII sample data. An explicit header marker such as
//! `<!-- Original: ../01-tutorials/README.md -->` is the reliable signal.

use crate::config::MarkersConfig;
use content_inspector::inspect;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// What the detector found at the top of a file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationMarkers {
    /// An explicit "translated from" header is present
    pub has_source_header: bool,
    /// A translation-note keyword is present
    pub has_translation_note: bool,
    /// Non-ASCII text appears in the leading sniff window
    pub has_non_ascii_content: bool,
}

/// Pluggable predicate for the target-side translation scan
pub trait LocalizationDetector {
    /// Inspect a file and report its markers. Unreadable files report none.
    fn inspect(&self, path: &Path) -> TranslationMarkers;

    /// Decide from the markers whether the file counts as translated
    fn is_localized(&self, markers: &TranslationMarkers) -> bool {
        markers.has_source_header || markers.has_non_ascii_content
    }
}

/// Default detector: header markers, note keywords and a non-ASCII sniff
#[derive(Debug, Clone)]
pub struct MarkerDetector {
    /// Explicit header markers
    header_markers: Vec<String>,
    /// Translation-note keywords
    note_keywords: Vec<String>,
    /// Bytes checked for non-ASCII text
    sniff_bytes: usize,
    /// Bytes searched for markers and keywords
    window_bytes: usize,
}

impl MarkerDetector {
    /// Build a detector from configuration
    #[must_use]
    pub fn from_config(config: &MarkersConfig) -> Self {
        Self {
            header_markers: config.header_markers.clone(),
            note_keywords: config.note_keywords.clone(),
            sniff_bytes: config.sniff_bytes.max(1),
            window_bytes: config.header_window_bytes.max(config.sniff_bytes),
        }
    }

    /// Inspect an in-memory file head
    #[must_use]
    pub fn inspect_bytes(&self, head: &[u8]) -> TranslationMarkers {
        if head.is_empty() || inspect(head).is_binary() {
            return TranslationMarkers::default();
        }

        let window = &head[..head.len().min(self.window_bytes)];
        let text = utf8_prefix(window);
        let sniff = &window[..window.len().min(self.sniff_bytes)];

        TranslationMarkers {
            has_source_header: self.header_markers.iter().any(|m| text.contains(m.as_str())),
            has_translation_note: self.note_keywords.iter().any(|k| text.contains(k.as_str())),
            has_non_ascii_content: !sniff.is_ascii(),
        }
    }
}

impl Default for MarkerDetector {
    fn default() -> Self {
        Self::from_config(&MarkersConfig::default())
    }
}

impl LocalizationDetector for MarkerDetector {
    fn inspect(&self, path: &Path) -> TranslationMarkers {
        match read_head(path, self.window_bytes) {
            Ok(head) => self.inspect_bytes(&head),
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "Cannot read file head");
                TranslationMarkers::default()
            }
        }
    }
}

/// Read at most `limit` bytes from the start of a file
fn read_head(path: &Path, limit: usize) -> std::io::Result<Vec<u8>> {
    let file = File::open(path)?;
    let mut head = Vec::with_capacity(limit.min(64 * 1024));
    file.take(limit as u64).read_to_end(&mut head)?;
    Ok(head)
}

/// Longest valid UTF-8 prefix; the window may cut a multi-byte character
fn utf8_prefix(bytes: &[u8]) -> &str {
    match simdutf8::compat::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => {
            let valid = &bytes[..e.valid_up_to()];
            // valid_up_to() guarantees this slice is UTF-8
            simdutf8::basic::from_utf8(valid).unwrap_or_default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_header_marker() {
        let detector = MarkerDetector::default();
        let markers =
            detector.inspect_bytes(b"<!-- Original: ../01-tutorials/README.md -->\n# Intro\n");

        assert!(markers.has_source_header);
        assert!(!markers.has_non_ascii_content);
        assert!(detector.is_localized(&markers));
    }

    #[test]
    fn test_non_ascii_content() {
        let detector = MarkerDetector::default();
        let markers = detector.inspect_bytes("# はじめに\n本文".as_bytes());

        assert!(markers.has_non_ascii_content);
        assert!(!markers.has_source_header);
        assert!(detector.is_localized(&markers));
    }

    #[test]
    fn test_plain_english_is_not_localized() {
        let detector = MarkerDetector::default();
        let markers = detector.inspect_bytes(b"# Getting started\nTranslation is hard.\n");

        assert!(markers.has_translation_note);
        assert!(!detector.is_localized(&markers));
    }

    #[test]
    fn test_non_ascii_beyond_sniff_window() {
        let config = MarkersConfig {
            sniff_bytes: 16,
            ..MarkersConfig::default()
        };
        let detector = MarkerDetector::from_config(&config);

        let mut content = "a".repeat(32).into_bytes();
        content.extend_from_slice("日本語".as_bytes());
        assert!(!detector.inspect_bytes(&content).has_non_ascii_content);
    }

    #[test]
    fn test_window_cutting_multibyte_char() {
        let config = MarkersConfig {
            header_window_bytes: 20,
            sniff_bytes: 20,
            ..MarkersConfig::default()
        };
        let detector = MarkerDetector::from_config(&config);

        // "<!-- 原文:" is 12 bytes; the window ends inside a 3-byte character
        let content = "<!-- 原文: 翻訳翻訳翻訳".as_bytes();
        let markers = detector.inspect_bytes(content);
        assert!(markers.has_source_header);
        assert!(markers.has_non_ascii_content);
    }

    #[test]
    fn test_binary_and_empty_files() {
        let detector = MarkerDetector::default();
        assert_eq!(
            detector.inspect_bytes(&[0u8, 159, 146, 150, 0, 1]),
            TranslationMarkers::default()
        );
        assert_eq!(detector.inspect_bytes(b""), TranslationMarkers::default());
    }

    #[test]
    fn test_inspect_file_and_missing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("intro.md");
        std::fs::write(&path, "<!-- 原文: ../01-tutorials/intro.md -->\n").unwrap();

        let detector = MarkerDetector::default();
        assert!(detector.inspect(&path).has_source_header);
        assert_eq!(
            detector.inspect(&dir.path().join("missing.md")),
            TranslationMarkers::default()
        );
    }
}
