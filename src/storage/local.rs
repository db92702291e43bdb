use async_trait::async_trait;
use bytes::Bytes;
use std::path::PathBuf;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::storage::StorageProvider;

/// Local file system storage backed by the configured media directory
pub struct LocalStorage {
    media_dir: PathBuf,
}

impl LocalStorage {
    pub fn new(media_dir: impl Into<PathBuf>) -> Self {
        Self {
            media_dir: media_dir.into(),
        }
    }

    fn full_path(&self, name: &str) -> PathBuf {
        self.media_dir.join(name)
    }
}

#[async_trait]
impl StorageProvider for LocalStorage {
    async fn put(&self, name: &str, data: Bytes) -> Result<()> {
        let full_path = self.full_path(name);

        // Ensure the media directory exists
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                AppError::Storage(format!("Failed to create media directory: {}", e))
            })?;
        }

        // Write file
        let mut file = fs::File::create(&full_path)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to create media file: {}", e)))?;
        file.write_all(&data)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to write media file: {}", e)))?;
        file.flush()
            .await
            .map_err(|e| AppError::Storage(format!("Failed to flush media file: {}", e)))?;

        tracing::debug!("Saved media to {:?}", full_path);
        Ok(())
    }

    fn url_for(&self, name: &str) -> String {
        format!("/media/{}", name)
    }

    fn backend(&self) -> &'static str {
        "local"
    }
}
