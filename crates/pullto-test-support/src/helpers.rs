//! Test helper functions and utilities

use crate::fixtures::sample_files;
use pullto_config::AppConfig;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Create a test configuration for testing
pub fn create_test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.logging.level = "debug".to_string();
    config
}

/// Temporary directory populated with the C# sample project
///
/// The directory is removed when the value is dropped.
pub struct SampleWorkspace {
    dir: TempDir,
}

impl SampleWorkspace {
    /// Write every sample file under a fresh temporary root
    pub fn new() -> std::io::Result<Self> {
        let dir = TempDir::new()?;
        for (relative, contents) in sample_files() {
            let path = dir.path().join(relative);
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, contents)?;
        }
        Ok(Self { dir })
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Absolute path of a file inside the workspace
    pub fn path(&self, relative: &str) -> PathBuf {
        self.dir.path().join(relative)
    }

    /// Add or overwrite a file
    pub fn write(&self, relative: &str, contents: &str) -> std::io::Result<PathBuf> {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, contents)?;
        Ok(path)
    }

    /// Current contents of a file
    pub fn read(&self, relative: &str) -> std::io::Result<String> {
        std::fs::read_to_string(self.path(relative))
    }
}
