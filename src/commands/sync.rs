use crate::LocsyncContext;
use crate::commands::context::CommandContext;
use crate::commands::{Outcome, print_info, print_success, print_warning};
use crate::mirror::{StructureChanges, StructureSync};
use crate::output;
use anyhow::Result;

/// Mirror new directories and files from the source into the target.
///
/// # Errors
///
/// Returns an error if the source tree does not exist.
pub fn execute(ctx: &LocsyncContext, dry_run: bool) -> Result<Outcome> {
    ctx.ensure_source()?;
    output::info("Synchronizing directory structure");

    let changes =
        StructureSync::new(&ctx.source_root, &ctx.target_root, &ctx.scan_options()).sync(dry_run)?;
    print_changes(&changes);

    Ok(Outcome::from_changes(changes.has_changes()))
}

fn print_changes(changes: &StructureChanges) {
    if !changes.dry_run {
        for dir in &changes.new_dirs {
            output::entry("+", &format!("Created directory {dir}/"));
        }
        for file in &changes.new_files {
            output::entry("+", &format!("Copied {file}"));
        }
    }

    for item in &changes.removed_items {
        print_warning(&format!("{item} no longer exists in the source (review manually)"));
    }
    for failure in &changes.failed {
        output::error(&failure.user_message());
    }

    println!();
    output::heading("Sync results");
    output::field("New directories", changes.new_dirs.len());
    output::field("New files", changes.new_files.len());
    output::field("Removed in source", changes.removed_items.len());
    if !changes.failed.is_empty() {
        output::field("Failed", changes.failed.len());
    }

    if changes.dry_run {
        println!();
        print_info("Dry run: nothing was changed");
        if !changes.new_dirs.is_empty() {
            output::heading("Directories to create:");
            for dir in &changes.new_dirs {
                output::entry("+", dir);
            }
        }
        if !changes.new_files.is_empty() {
            output::heading("Files to copy:");
            for file in &changes.new_files {
                output::entry("+", file);
            }
        }
    } else if !changes.has_changes() {
        println!();
        print_success("Structure is up to date");
    }
}
