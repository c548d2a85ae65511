use crate::LocsyncContext;
use crate::commands::context::CommandContext;
use crate::commands::{Outcome, print_success, print_warning};
use crate::output;
use crate::tracking::classifier::{UpdateItem, UpdateReport, check_updates_with_progress};
use crate::utils::formatters::{format_date, update_status_char, update_status_label};
use anyhow::Result;

/// Check which target files fell behind their source and record fresh
/// fingerprints.
///
/// # Errors
///
/// Returns an error if the source tree does not exist.
pub fn execute(ctx: &LocsyncContext) -> Result<Outcome> {
    ctx.ensure_source()?;
    output::info(&format!(
        "Checking {} against {}",
        ctx.target_root.display(),
        ctx.source_root.display()
    ));

    let files = ctx.source_files()?;
    let mut state = ctx.load_sync_state();

    let mut progress = output::start_progress("Fingerprinting", files.len());
    let report = check_updates_with_progress(
        &ctx.source_root,
        &ctx.target_root,
        &mut state,
        &files,
        |done| progress.set(done),
    );
    progress.finish();

    ctx.save_sync_state(&mut state);
    print_report(&report);

    Ok(Outcome::from_changes(report.has_changes()))
}

fn print_report(report: &UpdateReport) {
    output::heading("Check results");
    output::field("Eligible files", report.total_files);
    output::field("New files", report.new_files.len());
    output::field("Need update", report.updates_needed.len());
    output::field("Up to date", report.up_to_date);
    if !report.skipped.is_empty() {
        output::field("Unreadable", report.skipped.len());
    }

    if !report.new_files.is_empty() {
        println!();
        output::heading("New files:");
        for item in &report.new_files {
            output::entry(&update_status_char(item.status), &item.file);
        }
    }

    if !report.updates_needed.is_empty() {
        println!();
        output::heading("Files needing an update:");
        for item in &report.updates_needed {
            output::entry(
                &update_status_char(item.status),
                &format!("{} ({})", item.file, update_status_label(item.status)),
            );
        }
    }

    for file in &report.skipped {
        print_warning(&format!("Could not read {file}"));
    }

    if !report.has_changes() {
        println!();
        print_success("All files are up to date");
    }

    if output::is_verbose() && report.has_changes() {
        println!();
        output::heading("Details:");
        for item in report.new_files.iter().chain(&report.updates_needed) {
            print_details(item);
        }
    }
}

fn print_details(item: &UpdateItem) {
    output::field("File", &item.file);
    output::field("Source", item.source_path.display());
    output::field("Target", item.target_path.display());
    output::field("Status", item.status.as_str());
    output::field(
        "Source modified",
        format_date(item.source_modified.as_deref()),
    );
    println!();
}
