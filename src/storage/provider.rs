use async_trait::async_trait;
use bytes::Bytes;

use crate::error::Result;
use crate::storage::object_name;

/// Blob storage backend, selected once at startup
#[async_trait]
pub trait StorageProvider: Send + Sync {
    /// Write an object under the given name
    async fn put(&self, name: &str, data: Bytes) -> Result<()>;

    /// Resolve a stored object name to the reference recorded on items
    fn url_for(&self, name: &str) -> String;

    /// Store an uploaded file under a fresh object name and return its reference.
    /// The client-supplied name only contributes its extension.
    async fn store(&self, client_name: &str, data: Bytes) -> Result<String> {
        let name = object_name(client_name);
        self.put(&name, data).await?;
        Ok(self.url_for(&name))
    }

    /// Get the storage backend name
    fn backend(&self) -> &'static str;
}
