mod common;

use anyhow::Result;
use common::TestTrees;
use locsync::tracking::classifier::check_updates;
use locsync::tracking::state::{FileRecord, SyncState};
use std::fs;

#[test]
fn test_untouched_records_survive_save() -> Result<()> {
    let trees = TestTrees::new()?;
    trees.write_source("a.md", "a")?;
    trees.write_target("a.md", "a")?;

    let untouched = FileRecord {
        source_fingerprint: "0123456789abcdef0123456789abcdef".to_string(),
        source_modified_at: Some("2025-06-01T08:00:00+09:00".to_string()),
        needs_update: false,
    };

    let mut state = SyncState::new("../01-tutorials");
    state.record("elsewhere/kept.md", untouched.clone());
    state.save(&trees.state_file())?;

    let mut state = SyncState::load(&trees.state_file(), "../01-tutorials");
    check_updates(&trees.source, &trees.target, &mut state, &["a.md".to_string()]);
    state.save(&trees.state_file())?;

    let reloaded = SyncState::load(&trees.state_file(), "../01-tutorials");
    assert_eq!(reloaded.get("elsewhere/kept.md"), Some(&untouched));
    assert!(reloaded.get("a.md").is_some());
    Ok(())
}

#[test]
fn test_malformed_state_starts_fresh_and_run_completes() -> Result<()> {
    let trees = TestTrees::new()?;
    trees.write_source("a.md", "a")?;
    trees.write_target("a.md", "a")?;
    fs::write(trees.state_file(), "not json at all")?;

    let mut state = SyncState::load(&trees.state_file(), "../01-tutorials");
    assert!(state.is_empty());

    let report = check_updates(&trees.source, &trees.target, &mut state, &["a.md".to_string()]);
    assert_eq!(report.updates_needed.len(), 1);

    state.save(&trees.state_file())?;
    let reloaded = SyncState::load(&trees.state_file(), "../01-tutorials");
    assert_eq!(reloaded.len(), 1);
    Ok(())
}

#[test]
fn test_unknown_top_level_fields_survive() -> Result<()> {
    let trees = TestTrees::new()?;
    fs::write(
        trees.state_file(),
        r#"{
  "last_sync_check": "2025-01-01T00:00:00",
  "original_path": "../01-tutorials",
  "sync_status": {},
  "reviewers": ["alice", "bob"]
}"#,
    )?;

    let mut state = SyncState::load(&trees.state_file(), "ignored");
    state.save(&trees.state_file())?;

    let raw: serde_json::Value = serde_json::from_str(&fs::read_to_string(trees.state_file())?)?;
    assert_eq!(raw["reviewers"], serde_json::json!(["alice", "bob"]));
    assert_eq!(raw["original_path"], "../01-tutorials");
    assert_ne!(raw["last_sync_check"], "2025-01-01T00:00:00");
    Ok(())
}

#[test]
fn test_state_file_is_not_scanned_as_content() -> Result<()> {
    let trees = TestTrees::new()?;
    let mut state = SyncState::new("../01-tutorials");
    state.save(&trees.state_file())?;

    let files = locsync::tracking::scanner::TreeScanner::new(
        &trees.target,
        locsync::tracking::scanner::ScanOptions::default().with_extensions(["json"]),
    )
    .scan_files()?;
    assert!(files.is_empty());
    Ok(())
}
