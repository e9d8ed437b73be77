//! Filesystem-backed workspace host

use async_trait::async_trait;
use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;
use pullto_config::PullConfig;
use pullto_foundation::{FileHandle, NotifyLevel, PullError, PullResult, WorkspaceHost};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

/// Workspace host over a directory tree
///
/// File lookup walks the tree (respecting `.gitignore`) and skips paths
/// matching the configured exclude globs. Notifications go to the log and to
/// stderr.
pub struct FsHost {
    root: PathBuf,
    exclude: GlobSet,
}

impl FsHost {
    pub fn new(root: impl Into<PathBuf>, config: &PullConfig) -> PullResult<Self> {
        let mut builder = GlobSetBuilder::new();
        for pattern in &config.exclude {
            let glob = Glob::new(pattern).map_err(|e| {
                PullError::config(format!("Invalid exclude pattern '{}': {}", pattern, e))
            })?;
            builder.add(glob);
        }
        let exclude = builder
            .build()
            .map_err(|e| PullError::config(format!("Failed to build exclude matcher: {}", e)))?;

        Ok(Self {
            root: root.into(),
            exclude,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn is_excluded(&self, path: &Path) -> bool {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        self.exclude.is_match(relative)
    }
}

#[async_trait]
impl WorkspaceHost for FsHost {
    async fn find_files_by_name(&self, file_name: &str) -> Vec<FileHandle> {
        let mut files = Vec::new();
        for entry in WalkBuilder::new(&self.root).hidden(false).git_ignore(true).build() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(error = %e, "Walk error");
                    continue;
                }
            };
            let path = entry.path();
            if !path.is_file() || path.file_name().and_then(|n| n.to_str()) != Some(file_name) {
                continue;
            }
            if self.is_excluded(path) {
                debug!(path = %path.display(), "Excluded from target lookup");
                continue;
            }
            files.push(FileHandle::new(path));
        }
        files.sort_by(|a, b| a.path().cmp(b.path()));
        debug!(file_name, matches = files.len(), "Target lookup complete");
        files
    }

    async fn read_text(&self, file: &FileHandle) -> PullResult<String> {
        tokio::fs::read_to_string(file.path())
            .await
            .map_err(|e| PullError::io_at(e, file.path().display().to_string()))
    }

    async fn write_text(&self, file: &FileHandle, text: &str) -> bool {
        match tokio::fs::write(file.path(), text).await {
            Ok(()) => true,
            Err(e) => {
                warn!(path = %file.path().display(), error = %e, "Write failed");
                false
            }
        }
    }

    fn notify(&self, level: NotifyLevel, message: &str) {
        match level {
            NotifyLevel::Info => info!("{}", message),
            NotifyLevel::Warning => warn!("{}", message),
            NotifyLevel::Error => error!("{}", message),
        }
        let prefix = match level {
            NotifyLevel::Info => "info",
            NotifyLevel::Warning => "warning",
            NotifyLevel::Error => "error",
        };
        eprintln!("{}: {}", prefix, message);
    }
}
