use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Timeline entry kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum ItemType {
    Status,
    Image,
    Report,
}

impl ItemType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemType::Status => "status",
            ItemType::Image => "image",
            ItemType::Report => "report",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "status" => Some(ItemType::Status),
            "image" => Some(ItemType::Image),
            "report" => Some(ItemType::Report),
            _ => None,
        }
    }

    /// Whether creating an item of this kind requires a file payload
    pub fn requires_file(&self) -> bool {
        matches!(self, ItemType::Image | ItemType::Report)
    }
}

/// Timeline item model
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct TimelineItem {
    pub id: i64,
    #[serde(rename = "type")]
    pub item_type: ItemType,
    pub text: Option<String>,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// File payload carried from the HTTP layer
#[derive(Debug, Clone)]
pub struct MediaUpload {
    pub filename: String,
    pub data: Bytes,
}

/// Payload assembled by the handlers for item creation
#[derive(Debug, Clone)]
pub struct NewTimelineItem {
    pub item_type: ItemType,
    pub text: Option<String>,
    pub file: Option<MediaUpload>,
}

/// Pagination query parameters
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    100
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn item_type_strings() {
        assert_eq!(ItemType::Status.as_str(), "status");
        assert_eq!(ItemType::from_str("REPORT"), Some(ItemType::Report));
        assert_eq!(ItemType::from_str("video"), None);
        assert!(!ItemType::Status.requires_file());
        assert!(ItemType::Image.requires_file());
        assert!(ItemType::Report.requires_file());
    }

    #[test]
    fn item_serializes_with_wire_names() {
        let item = TimelineItem {
            id: 7,
            item_type: ItemType::Image,
            text: None,
            image_url: Some("/media/abc.png".to_string()),
            created_at: Utc.with_ymd_and_hms(2026, 8, 23, 12, 0, 0).unwrap(),
        };

        let value = serde_json::to_value(&item).expect("serialize");
        assert_eq!(value["id"], 7);
        assert_eq!(value["type"], "image");
        assert!(value["text"].is_null());
        assert_eq!(value["image_url"], "/media/abc.png");
        assert_eq!(value["created_at"], "2026-08-23T12:00:00Z");
    }

    #[test]
    fn item_deserializes_from_wire_shape() {
        let raw = r#"{
            "id": 3,
            "type": "status",
            "text": "Feeling good today!",
            "image_url": null,
            "created_at": "2026-08-23T12:00:00Z"
        }"#;

        let item: TimelineItem = serde_json::from_str(raw).expect("deserialize");
        assert_eq!(item.id, 3);
        assert_eq!(item.item_type, ItemType::Status);
        assert_eq!(item.text.as_deref(), Some("Feeling good today!"));
        assert!(item.image_url.is_none());
    }
}
