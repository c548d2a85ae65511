use crate::tracking::classifier::UpdateStatus;
use crate::tracking::translation::TranslationStatus;
use chrono::{DateTime, Local};
use colored::Colorize;
use std::time::Duration;

/// Colored single-character marker for a source-side status
#[must_use]
pub fn update_status_char(status: UpdateStatus) -> String {
    match status {
        UpdateStatus::New => "+".green().to_string(),
        UpdateStatus::Updated => "M".yellow().to_string(),
        UpdateStatus::NotTracked => "?".bright_black().to_string(),
        UpdateStatus::Current => " ".to_string(),
    }
}

/// Human-readable label for a source-side status
#[must_use]
pub const fn update_status_label(status: UpdateStatus) -> &'static str {
    match status {
        UpdateStatus::New => "new file",
        UpdateStatus::Updated => "source updated",
        UpdateStatus::NotTracked => "not tracked",
        UpdateStatus::Current => "up to date",
    }
}

/// Colored label for a target-side status
#[must_use]
pub fn translation_status_label(status: TranslationStatus) -> String {
    match status {
        TranslationStatus::Translated => "translated".green().to_string(),
        TranslationStatus::Pending => "pending".yellow().to_string(),
        TranslationStatus::NeedsUpdate => "needs update".red().to_string(),
        TranslationStatus::Orphaned => "orphaned".bright_black().to_string(),
    }
}

/// Date part of an RFC 3339 timestamp, or `unknown`
#[must_use]
pub fn format_date(timestamp: Option<&str>) -> String {
    match timestamp {
        Some(ts) if ts.len() >= 10 && ts.is_char_boundary(10) => ts[..10].to_string(),
        _ => "unknown".to_string(),
    }
}

/// How long ago an RFC 3339 timestamp was, e.g. `3days 4h ago`
#[must_use]
pub fn format_age(timestamp: &str) -> String {
    let Ok(then) = DateTime::parse_from_rfc3339(timestamp) else {
        return "unknown".to_string();
    };

    let elapsed = Local::now().signed_duration_since(then);
    let Ok(elapsed) = elapsed.to_std() else {
        return "in the future".to_string();
    };

    if elapsed.as_secs() < 60 {
        return "just now".to_string();
    }

    // Whole minutes keep the output short
    let rounded = Duration::from_secs(elapsed.as_secs() / 60 * 60);
    format!("{} ago", humantime::format_duration(rounded))
}

/// Percentage with one decimal place
#[must_use]
pub fn format_percent(value: f64) -> String {
    format!("{value:.1}%")
}

/// Truncates a string to a maximum number of characters with ellipsis
#[must_use]
pub fn truncate_with_ellipsis(s: &str, max_len: usize) -> String {
    let count = s.chars().count();
    if count <= max_len {
        s.to_string()
    } else if max_len < 3 {
        s.chars().take(max_len).collect()
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{head}...")
    }
}
