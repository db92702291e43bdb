pub mod local;
pub mod provider;
pub mod s3;

pub use local::*;
pub use provider::*;
pub use s3::*;

use std::path::Path;
use std::sync::Arc;
use uuid::Uuid;

use crate::config::Config;
use crate::error::{AppError, Result};

/// Fallback extension used when the client name carries none we recognize
const DEFAULT_EXTENSION: &str = "jpg";

/// Build the storage provider selected by the configuration
pub fn from_config(config: &Config) -> Result<Arc<dyn StorageProvider>> {
    match config.storage.backend.as_str() {
        "local" => Ok(Arc::new(LocalStorage::new(
            config.storage.local.media_dir.clone(),
        ))),
        "s3" => Ok(Arc::new(S3Storage::new(config.storage.s3.clone()))),
        other => Err(AppError::Internal(format!(
            "Unknown storage backend: {}",
            other
        ))),
    }
}

/// Generate a fresh object name from a client-supplied file name.
/// Only the extension survives; the rest is replaced with a random UUID.
/// Client names are never used as path components.
pub fn object_name(client_name: &str) -> String {
    let ext = Path::new(client_name)
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| !mime_guess::from_ext(e).is_empty())
        .unwrap_or(DEFAULT_EXTENSION);

    format!("{}.{}", Uuid::new_v4(), ext)
}
