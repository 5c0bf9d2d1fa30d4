use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Private scratch directory for one pipeline run.
///
/// The directory is removed when the value is dropped, on every exit path.
/// Removal failures are logged and never reach the caller.
#[derive(Debug)]
pub struct Workspace {
    id: Uuid,
    dir: Option<TempDir>,
    path: PathBuf,
}

impl Workspace {
    /// Creates `<root>/<purpose>-<uuid>-<random>`.
    pub fn acquire(root: &Path, purpose: &str) -> AppResult<Self> {
        let id = Uuid::new_v4();

        let dir = tempfile::Builder::new()
            .prefix(&format!("{}-{}-", purpose, id))
            .tempdir_in(root)
            .map_err(|e| {
                AppError::internal(format!(
                    "failed to create workspace in {}: {}",
                    root.display(),
                    e
                ))
            })?;

        let path = dir.path().to_path_buf();
        info!(workspace = %path.display(), purpose = purpose, "workspace created");

        Ok(Self {
            id,
            dir: Some(dir),
            path,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn join(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.path.join(relative)
    }

    pub async fn write(&self, relative: impl AsRef<Path>, contents: &[u8]) -> AppResult<PathBuf> {
        let target = self.join(relative);
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        debug!(bytes = contents.len(), file_location = %target.display(), "writing file");
        tokio::fs::write(&target, contents).await?;
        Ok(target)
    }

    pub async fn read(&self, relative: impl AsRef<Path>) -> AppResult<Vec<u8>> {
        let target = self.join(relative);
        tokio::fs::read(&target).await.map_err(|e| {
            AppError::internal(format!("failed reading {}: {}", target.display(), e))
        })
    }

    /// Removes the directory now instead of waiting for drop.
    pub fn release(mut self) {
        self.remove();
    }

    fn remove(&mut self) {
        if let Some(dir) = self.dir.take() {
            info!(workspace = %self.path.display(), "removing workspace");
            if let Err(e) = dir.close() {
                error!(workspace = %self.path.display(), error = %e, "failed to remove workspace");
            }
        }
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        self.remove();
    }
}
