use anyhow::Result;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use autoimport::{Config, Workspace};

pub struct TestHarness {
    pub temp_dir: TempDir,
    pub config: Config,
}

impl TestHarness {
    pub fn new() -> Result<Self> {
        Ok(Self {
            temp_dir: TempDir::new()?,
            config: Config::default(),
        })
    }

    /// Harness whose temp directory name starts with `prefix`
    pub fn with_prefix(prefix: &str) -> Result<Self> {
        Ok(Self {
            temp_dir: tempfile::Builder::new().prefix(prefix).tempdir()?,
            config: Config::default(),
        })
    }

    pub fn create_test_file(&self, path: &str, content: &str) -> Result<PathBuf> {
        let file_path = self.temp_dir.path().join(path);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&file_path, content)?;
        Ok(file_path)
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Workspace over the temp directory with project and packages scanned
    pub async fn scanned_workspace(&self) -> Result<Workspace> {
        let mut workspace = Workspace::new(self.path().to_path_buf(), self.config.clone())?;
        workspace.scan_project().await?;
        workspace.scan_packages().await?;
        Ok(workspace)
    }
}
