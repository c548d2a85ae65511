#![allow(dead_code)]

use anyhow::Result;
use filetime::FileTime;
use locsync::LocsyncContext;
use locsync::config::Config;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A source tree and its localized copy, side by side like
/// `01-tutorials` and `01-tutorials-ja`
pub struct TestTrees {
    pub temp_dir: TempDir,
    pub source: PathBuf,
    pub target: PathBuf,
}

impl TestTrees {
    /// Create both roots, empty
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let source = temp_dir.path().join("01-tutorials");
        let target = temp_dir.path().join("01-tutorials-ja");
        fs::create_dir_all(&source)?;
        fs::create_dir_all(&target)?;

        Ok(Self {
            temp_dir,
            source,
            target,
        })
    }

    /// Directory containing both roots
    pub fn base(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn write_source(&self, rel: &str, content: &str) -> Result<PathBuf> {
        write_file(&self.source, rel, content)
    }

    pub fn write_target(&self, rel: &str, content: &str) -> Result<PathBuf> {
        write_file(&self.target, rel, content)
    }

    pub fn read_target(&self, rel: &str) -> Result<String> {
        Ok(fs::read_to_string(self.target.join(rel))?)
    }

    /// Context with explicit roots and default configuration
    pub fn context(&self) -> LocsyncContext {
        LocsyncContext::new_explicit(self.target.clone(), self.source.clone(), Config::default())
    }

    /// Location of the state file in the target root
    pub fn state_file(&self) -> PathBuf {
        self.target.join(locsync::DEFAULT_STATE_FILE)
    }
}

fn write_file(root: &Path, rel: &str, content: &str) -> Result<PathBuf> {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, content)?;
    Ok(path)
}

/// Set a file's modification time to a fixed Unix timestamp
pub fn set_file_mtime(path: &Path, unix_seconds: i64) -> Result<()> {
    filetime::set_file_mtime(path, FileTime::from_unix_time(unix_seconds, 0))?;
    Ok(())
}

/// Every relative path under a root, directories included, sorted
pub fn list_tree(root: &Path) -> Vec<String> {
    let mut entries: Vec<String> = walkdir::WalkDir::new(root)
        .min_depth(1)
        .into_iter()
        .filter_map(Result::ok)
        .filter_map(|e| locsync::utils::paths::relative_key(e.path(), root))
        .collect();
    entries.sort();
    entries
}
