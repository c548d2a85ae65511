mod common;

use anyhow::Result;
use assert_cmd::Command;
use common::TestTrees;
use predicates::prelude::*;

fn locsync(trees: &TestTrees) -> Result<Command> {
    let mut cmd = Command::cargo_bin("locsync")?;
    cmd.env_remove("LOCSYNC_CONFIG_PATH")
        .env_remove("RUST_LOG")
        .arg("--target")
        .arg(&trees.target);
    Ok(cmd)
}

#[test]
fn test_check_exit_codes() -> Result<()> {
    let trees = TestTrees::new()?;
    trees.write_source("a.md", "# A")?;
    trees.write_target("a.md", "# A")?;

    // First observation flags the file
    locsync(&trees)?
        .arg("check")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("a.md (not tracked)"));

    locsync(&trees)?
        .arg("check")
        .assert()
        .code(0)
        .stdout(predicate::str::contains("All files are up to date"));

    assert!(trees.state_file().exists());
    Ok(())
}

#[test]
fn test_check_infers_sibling_source() -> Result<()> {
    let trees = TestTrees::new()?;
    trees.write_source("new.md", "# New")?;

    // No --source: 01-tutorials-ja maps to ../01-tutorials
    locsync(&trees)?
        .arg("check")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("new.md"));
    Ok(())
}

#[test]
fn test_missing_source_exits_2() -> Result<()> {
    let trees = TestTrees::new()?;

    locsync(&trees)?
        .arg("--source")
        .arg(trees.base().join("does-not-exist"))
        .arg("check")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Source Root Missing: Source directory not found"));
    Ok(())
}

#[test]
fn test_sync_dry_run_creates_nothing() -> Result<()> {
    let trees = TestTrees::new()?;
    trees.write_source("lab1/intro.md", "# Intro")?;

    locsync(&trees)?
        .args(["sync", "--dry-run"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Dry run"));
    assert!(!trees.target.join("lab1").exists());

    locsync(&trees)?.arg("sync").assert().code(1);
    assert!(trees.target.join("lab1/intro.md").exists());

    locsync(&trees)?.arg("sync").assert().code(0);
    Ok(())
}

#[test]
fn test_sync_with_failed_item_exits_1() -> Result<()> {
    let trees = TestTrees::new()?;
    trees.write_source("lab1/intro.md", "# Intro")?;
    trees.write_target("lab1", "not a directory")?;

    locsync(&trees)?
        .arg("sync")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Structure is up to date").not());
    Ok(())
}

#[test]
fn test_status_json() -> Result<()> {
    let trees = TestTrees::new()?;
    trees.write_source("a.md", "# A")?;
    trees.write_target("a.md", "<!-- Original: ../01-tutorials/a.md -->\n# A")?;

    let output = locsync(&trees)?
        .args(["status", "--format", "json"])
        .assert()
        .code(0)
        .get_output()
        .stdout
        .clone();

    let report: serde_json::Value = serde_json::from_slice(&output)?;
    assert_eq!(report["total_files"], 1);
    assert_eq!(report["translated_files"], 1);
    assert_eq!(report["files"][0]["status"], "translated");
    Ok(())
}

#[test]
fn test_status_table() -> Result<()> {
    let trees = TestTrees::new()?;
    trees.write_source("a.md", "# A")?;
    trees.write_target("a.md", "# A")?;

    locsync(&trees)?
        .args(["status", "--format", "table"])
        .assert()
        .code(0)
        .stdout(predicate::str::contains("Source date"))
        .stdout(predicate::str::contains("Files needing translation (1)"));
    Ok(())
}

#[test]
fn test_setup_list_and_create() -> Result<()> {
    let trees = TestTrees::new()?;
    std::fs::create_dir_all(trees.base().join("02-samples"))?;
    std::fs::write(trees.base().join("02-samples/README.md"), "# Samples")?;

    Command::cargo_bin("locsync")?
        .env_remove("LOCSYNC_CONFIG_PATH")
        .args(["setup", "--list", "--base"])
        .arg(trees.base())
        .assert()
        .code(0)
        .stdout(predicate::str::contains("02-samples -> 02-samples-ja"));

    Command::cargo_bin("locsync")?
        .env_remove("LOCSYNC_CONFIG_PATH")
        .args(["setup", "02-samples", "--base"])
        .arg(trees.base())
        .assert()
        .code(0);
    assert!(trees.base().join("02-samples-ja/sync-status.json").exists());
    Ok(())
}

#[test]
fn test_completion() -> Result<()> {
    Command::cargo_bin("locsync")?
        .args(["completion", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("locsync"));
    Ok(())
}
