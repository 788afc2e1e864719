use async_trait::async_trait;
use std::path::PathBuf;
use tracing::info;

use crate::domain::error::Result;

/// Where processed files end up once the user "downloads" them.
#[async_trait]
pub trait DownloadSink {
    async fn save(&self, file_name: &str, bytes: &[u8]) -> Result<PathBuf>;
}

/// Writes downloads into a directory, replacing any file of the same name.
pub struct DirectoryDownloads {
    dir: PathBuf,
}

impl DirectoryDownloads {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl DownloadSink for DirectoryDownloads {
    async fn save(&self, file_name: &str, bytes: &[u8]) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let target = self.dir.join(file_name);
        tokio::fs::write(&target, bytes).await?;
        info!(path = %target.display(), bytes = bytes.len(), "Download saved");
        Ok(target)
    }
}
