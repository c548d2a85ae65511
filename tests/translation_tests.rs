mod common;

use anyhow::Result;
use common::TestTrees;
use locsync::commands::context::CommandContext;
use locsync::tracking::classifier::check_updates;
use locsync::tracking::translation::{TranslationStatus, analyze_translation_status};

fn status_of(
    report: &locsync::tracking::translation::TranslationReport,
    file: &str,
) -> TranslationStatus {
    report
        .files
        .iter()
        .find(|f| f.file == file)
        .map(|f| f.status)
        .expect("file reported")
}

#[test]
fn test_statuses_after_check() -> Result<()> {
    let trees = TestTrees::new()?;
    trees.write_source("header.md", "# Setup")?;
    trees.write_source("english.md", "# Untouched")?;
    trees.write_source("settled.md", "# Settled")?;
    trees.write_target(
        "header.md",
        "<!-- 原文: ../01-tutorials/header.md -->\n# Setup\n",
    )?;
    trees.write_target("english.md", "# Untouched")?;
    trees.write_target("settled.md", "# Settled")?;
    trees.write_target("orphan.md", "# Removed upstream")?;

    let ctx = trees.context();
    let files = ctx.source_files()?;

    // Two checks: the first flags settled.md as not tracked, the second clears it
    let mut state = ctx.load_sync_state();
    check_updates(&trees.source, &trees.target, &mut state, &files);
    check_updates(&trees.source, &trees.target, &mut state, &files);
    // english.md changed upstream after that
    trees.write_source("english.md", "# Untouched, edited")?;
    check_updates(&trees.source, &trees.target, &mut state, &files);

    let report = analyze_translation_status(
        &trees.source,
        &trees.target,
        &state,
        &ctx.scan_options(),
        &ctx.detector(),
    )?;

    assert_eq!(status_of(&report, "header.md"), TranslationStatus::Translated);
    assert_eq!(status_of(&report, "english.md"), TranslationStatus::NeedsUpdate);
    assert_eq!(status_of(&report, "settled.md"), TranslationStatus::Pending);
    assert_eq!(status_of(&report, "orphan.md"), TranslationStatus::Orphaned);
    assert_eq!(report.total_files, 4);
    assert_eq!(report.pending_files, 2);
    Ok(())
}

#[test]
fn test_ascii_file_without_record_needs_update() -> Result<()> {
    let trees = TestTrees::new()?;
    trees.write_source("lab/notebook.ipynb", "{}")?;
    trees.write_target("lab/notebook.ipynb", "{}")?;

    let ctx = trees.context();
    let report = analyze_translation_status(
        &trees.source,
        &trees.target,
        &ctx.load_sync_state(),
        &ctx.scan_options(),
        &ctx.detector(),
    )?;

    let file = &report.files[0];
    assert_eq!(file.status, TranslationStatus::NeedsUpdate);
    assert!(file.needs_update);
    assert!(file.original_modified.is_none());
    Ok(())
}

#[test]
fn test_json_report_keeps_unicode() -> Result<()> {
    let trees = TestTrees::new()?;
    trees.write_source("はじめに.md", "# Intro")?;
    trees.write_target("はじめに.md", "# はじめに")?;

    let ctx = trees.context();
    let report = analyze_translation_status(
        &trees.source,
        &trees.target,
        &ctx.load_sync_state(),
        &ctx.scan_options(),
        &ctx.detector(),
    )?;

    let json = locsync::commands::status::render_json(&report)?;
    assert!(json.contains("はじめに.md"));
    assert!(json.contains("\"status\": \"translated\""));
    assert!(json.contains("\"original_modified\": \"unknown\""));
    Ok(())
}
