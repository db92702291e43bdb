use chrono::Utc;

use crate::db::Database;
use crate::error::{AppError, Result};
use crate::models::{NewTimelineItem, TimelineItem};
use crate::storage::StorageProvider;

/// Maximum number of items returned by a single list call
pub const MAX_PAGE_SIZE: i64 = 100;

/// Timeline service
pub struct TimelineService;

impl TimelineService {
    /// Create a timeline item, storing its media first when present.
    ///
    /// If the insert fails after the media write succeeded, the stored blob
    /// is orphaned; it is logged for manual cleanup and the error propagates.
    pub async fn create(
        db: &Database,
        storage: &dyn StorageProvider,
        new_item: NewTimelineItem,
    ) -> Result<TimelineItem> {
        // A missing part and a zero-byte payload both fail the requirement
        let has_file = matches!(&new_item.file, Some(file) if !file.data.is_empty());
        if new_item.item_type.requires_file() && !has_file {
            return Err(AppError::Validation(
                "File is required for this item type".to_string(),
            ));
        }

        // Status items never carry media, even if a file was sent along
        let file = if new_item.item_type.requires_file() {
            new_item.file
        } else {
            None
        };

        let image_url = match file {
            Some(file) => Some(storage.store(&file.filename, file.data).await?),
            None => None,
        };

        let created_at = Utc::now();
        let result = sqlx::query(
            "INSERT INTO timeline_items (item_type, text, image_url, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(new_item.item_type.as_str())
        .bind(&new_item.text)
        .bind(&image_url)
        .bind(created_at)
        .execute(db.pool())
        .await;

        let result = match result {
            Ok(result) => result,
            Err(e) => {
                if let Some(url) = &image_url {
                    tracing::warn!(
                        "Insert failed after media upload, orphaned blob at {}",
                        url
                    );
                }
                return Err(e.into());
            }
        };

        let item = sqlx::query_as("SELECT * FROM timeline_items WHERE id = ?")
            .bind(result.last_insert_rowid())
            .fetch_one(db.pool())
            .await?;

        Ok(item)
    }

    /// List items, newest first
    pub async fn list(db: &Database, skip: i64, limit: i64) -> Result<Vec<TimelineItem>> {
        let skip = skip.max(0);
        let limit = limit.clamp(0, MAX_PAGE_SIZE);

        let items = sqlx::query_as(
            "SELECT * FROM timeline_items ORDER BY created_at DESC, id DESC LIMIT ? OFFSET ?",
        )
        .bind(limit)
        .bind(skip)
        .fetch_all(db.pool())
        .await?;

        Ok(items)
    }

    /// Fetch a single item
    pub async fn get(db: &Database, id: i64) -> Result<TimelineItem> {
        let item: Option<TimelineItem> =
            sqlx::query_as("SELECT * FROM timeline_items WHERE id = ?")
                .bind(id)
                .fetch_optional(db.pool())
                .await?;

        item.ok_or_else(|| AppError::NotFound(format!("Timeline item {} not found", id)))
    }
}
