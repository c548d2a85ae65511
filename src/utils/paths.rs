use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Converts a path relative to `base` into the `/`-separated key used in the
/// sync state. Returns `None` when `path` is not under `base`.
#[must_use]
pub fn relative_key(path: &Path, base: &Path) -> Option<String> {
    let relative = path.strip_prefix(base).ok()?;
    let parts: Vec<String> = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}

/// Joins a `/`-separated relative key onto a root using native separators
#[must_use]
pub fn join_key(root: &Path, key: &str) -> PathBuf {
    key.split('/')
        .filter(|part| !part.is_empty())
        .fold(root.to_path_buf(), |acc, part| acc.join(part))
}

/// Ensures parent directories exist for a given path
///
/// # Errors
///
/// Returns an error if the parent directories cannot be created
pub fn ensure_parent_dirs(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        fs::create_dir_all(parent).with_context(|| {
            format!("Failed to create parent directories for {}", path.display())
        })?;
    }
    Ok(())
}

/// Expands tilde in path to home directory
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined
pub fn expand_tilde(path: &Path) -> Result<PathBuf> {
    if let Some(path_str) = path.to_str()
        && (path_str.starts_with("~/") || path_str == "~")
    {
        let home = dirs::home_dir().context("Could not find home directory")?;
        if path_str == "~" {
            return Ok(home);
        }
        return Ok(home.join(&path_str[2..]));
    }
    Ok(path.to_path_buf())
}

/// Resolves `path` against `base` unless it is already absolute
///
/// # Errors
///
/// Returns an error if tilde expansion fails
pub fn resolve_against(base: &Path, path: &Path) -> Result<PathBuf> {
    let expanded = expand_tilde(path)?;
    if expanded.is_absolute() {
        Ok(expanded)
    } else {
        Ok(base.join(expanded))
    }
}

/// Whether anything exists at `path`, without following symlinks. A dangling
/// link counts as present.
#[must_use]
pub fn entry_exists(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

/// Last modification time of a file in local time, if the platform reports one
#[must_use]
pub fn modified_at(path: &Path) -> Option<DateTime<Local>> {
    fs::metadata(path)
        .and_then(|m| m.modified())
        .ok()
        .map(DateTime::<Local>::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[cfg(unix)]
    #[test]
    fn test_entry_exists_keeps_dangling_links() -> Result<()> {
        let dir = TempDir::new()?;
        let link = dir.path().join("link.md");
        std::os::unix::fs::symlink(dir.path().join("gone.md"), &link)?;

        assert!(entry_exists(&link));
        assert!(!link.exists());
        assert!(!entry_exists(&dir.path().join("never.md")));
        Ok(())
    }

    #[test]
    fn test_relative_key() {
        let base = PathBuf::from("/work/01-tutorials");
        let path = base.join("lab1").join("intro.md");

        assert_eq!(relative_key(&path, &base), Some("lab1/intro.md".to_string()));
        assert_eq!(relative_key(&base, &base), None);
        assert_eq!(relative_key(Path::new("/elsewhere/x.md"), &base), None);
    }

    #[test]
    fn test_join_key_round_trip() {
        let root = PathBuf::from("/work/01-tutorials-ja");
        let joined = join_key(&root, "lab1/images/diagram.md");

        assert_eq!(joined, root.join("lab1").join("images").join("diagram.md"));
        assert_eq!(relative_key(&joined, &root).as_deref(), Some("lab1/images/diagram.md"));
    }

    #[test]
    fn test_ensure_parent_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let nested_file = temp_dir.path().join("a/b/c/file.md");

        ensure_parent_dirs(&nested_file).unwrap();
        assert!(nested_file.parent().unwrap().exists());
        ensure_parent_dirs(Path::new("bare.md")).unwrap();
    }

    #[test]
    fn test_resolve_against() {
        let base = PathBuf::from("/work/01-tutorials-ja");

        let relative = resolve_against(&base, Path::new("../01-tutorials")).unwrap();
        assert_eq!(relative, base.join("../01-tutorials"));

        let absolute = resolve_against(&base, Path::new("/srv/source")).unwrap();
        assert_eq!(absolute, PathBuf::from("/srv/source"));
    }

    #[test]
    fn test_modified_at() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("x.md");
        fs::write(&file, "x").unwrap();

        assert!(modified_at(&file).is_some());
        assert!(modified_at(&temp_dir.path().join("missing.md")).is_none());
    }
}
