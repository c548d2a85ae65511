use crate::LocsyncContext;
use crate::commands::context::CommandContext;
use crate::output;
use crate::tracking::translation::{TranslationReport, analyze_translation_status};
use crate::utils::formatters::{
    format_age, format_date, format_percent, translation_status_label, truncate_with_ellipsis,
};
use anyhow::{Context, Result};
use clap::ValueEnum;

/// Number of files listed in the "needs translation" section
const TODO_LIST_LIMIT: usize = 10;

/// Presentation of the translation report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum StatusFormat {
    /// Totals and the first files still to translate
    #[default]
    Summary,
    /// Totals plus one row per file
    Table,
    /// The full report as JSON
    Json,
}

/// Show translation progress of the target tree.
///
/// # Errors
///
/// Returns an error if either tree does not exist or JSON serialization fails.
pub fn execute(ctx: &LocsyncContext, format: StatusFormat) -> Result<()> {
    ctx.ensure_source()?;

    let state = ctx.load_sync_state();
    let report = analyze_translation_status(
        &ctx.source_root,
        &ctx.target_root,
        &state,
        &ctx.scan_options(),
        &ctx.detector(),
    )?;

    match format {
        StatusFormat::Json => {
            let json = render_json(&report)?;
            println!("{json}");
        }
        StatusFormat::Summary => {
            print_summary(&report, &state.last_checked_at);
            print_todo(&report);
        }
        StatusFormat::Table => {
            print_summary(&report, &state.last_checked_at);
            println!();
            print_table(&report);
            print_todo(&report);
        }
    }

    Ok(())
}

/// Pretty JSON with non-ASCII paths kept verbatim
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn render_json(report: &TranslationReport) -> Result<String> {
    serde_json::to_string_pretty(report).context("Failed to serialize translation report")
}

fn print_summary(report: &TranslationReport, last_checked_at: &str) {
    output::heading("Translation status");
    output::field("Total files", report.total_files);
    output::field("Translated", report.translated_files);
    output::field("Waiting", report.pending_files);
    if report.orphaned_files > 0 {
        output::field("Orphaned", report.orphaned_files);
    }
    output::field("Progress", format_percent(report.progress_percent()));
    output::field("Last check", format_age(last_checked_at));
}

fn print_table(report: &TranslationReport) {
    println!(
        "{:<50} {:<14} {:<8} {:<12}",
        "File", "Status", "Update", "Source date"
    );
    println!("{}", "-".repeat(87));

    let mut files: Vec<_> = report.files.iter().collect();
    files.sort_by(|a, b| a.file.cmp(&b.file));

    for file in files {
        // Pad before coloring so ANSI codes do not break alignment
        let label = translation_status_label(file.status);
        let padding = " ".repeat(14usize.saturating_sub(file.status.as_str().len()));
        println!(
            "{:<50} {label}{padding} {:<8} {:<12}",
            truncate_with_ellipsis(&file.file, 50),
            if file.needs_update { "yes" } else { "no" },
            format_date(file.original_modified.as_deref()),
        );
    }
}

fn print_todo(report: &TranslationReport) {
    let todo = report.needing_translation();
    if todo.is_empty() {
        return;
    }

    println!();
    output::heading(&format!("Files needing translation ({}):", todo.len()));
    for file in todo.iter().take(TODO_LIST_LIMIT) {
        output::entry("-", &format!("{} ({})", file.file, file.status.as_str()));
    }
    if todo.len() > TODO_LIST_LIMIT {
        output::entry(" ", &format!("... and {} more", todo.len() - TODO_LIST_LIMIT));
    }
}
