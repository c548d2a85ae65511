#[cfg(test)]
pub mod fixtures {
    use anyhow::Result;
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    /// A source tree and its target copy side by side in one temp directory
    pub struct TestTrees {
        pub temp_dir: TempDir,
        pub source: PathBuf,
        pub target: PathBuf,
    }

    impl TestTrees {
        pub fn new() -> Result<Self> {
            let temp_dir = tempfile::tempdir()?;
            let source = temp_dir.path().join("src");
            let target = temp_dir.path().join("src-ja");
            fs::create_dir_all(&source)?;
            fs::create_dir_all(&target)?;

            Ok(Self {
                temp_dir,
                source,
                target,
            })
        }

        pub fn source(&self) -> &Path {
            &self.source
        }

        pub fn target(&self) -> &Path {
            &self.target
        }

        pub fn write_source(&self, rel: &str, content: &str) -> Result<PathBuf> {
            write_file(&self.source, rel, content)
        }

        pub fn write_target(&self, rel: &str, content: &str) -> Result<PathBuf> {
            write_file(&self.target, rel, content)
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
}
