use axum::{
    extract::{FromRequest, Multipart, Path, Query, Request, State},
    http::header::CONTENT_TYPE,
    Form, Json,
};
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::models::{ItemType, ListQuery, MediaUpload, NewTimelineItem, TimelineItem};
use crate::services::TimelineService;
use crate::AppState;

/// List timeline items, newest first
/// GET /api/timeline/?skip=0&limit=100
pub async fn list_items(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<TimelineItem>>> {
    let items = TimelineService::list(&state.db, query.skip, query.limit).await?;
    Ok(Json(items))
}

/// Get a single timeline item
/// GET /api/timeline/:id
pub async fn get_item(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<TimelineItem>> {
    let item = TimelineService::get(&state.db, id).await?;
    Ok(Json(item))
}

/// Form-encoded create payload (no file attached)
#[derive(Debug, Deserialize)]
pub struct CreateForm {
    #[serde(rename = "type")]
    pub item_type: String,
    pub text: Option<String>,
}

/// Create a timeline item
/// POST /api/timeline/
///
/// Accepts multipart/form-data (type, text, file) for uploads and plain
/// application/x-www-form-urlencoded (type, text) for text-only entries.
pub async fn create_item(
    State(state): State<AppState>,
    request: Request,
) -> Result<Json<TimelineItem>> {
    let content_type = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    let new_item = if content_type.starts_with("multipart/form-data") {
        let multipart = Multipart::from_request(request, &state)
            .await
            .map_err(|e| AppError::Validation(format!("Invalid multipart request: {}", e)))?;
        parse_multipart(multipart).await?
    } else {
        let Form(form) = Form::<CreateForm>::from_request(request, &state)
            .await
            .map_err(|e| AppError::Validation(format!("Invalid form payload: {}", e)))?;
        build_new_item(Some(form.item_type), form.text, None)?
    };

    let item = TimelineService::create(&state.db, state.storage.as_ref(), new_item).await?;
    Ok(Json(item))
}

async fn parse_multipart(mut multipart: Multipart) -> Result<NewTimelineItem> {
    let mut item_type: Option<String> = None;
    let mut text: Option<String> = None;
    let mut file: Option<MediaUpload> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Failed to process multipart: {}", e)))?
    {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "type" => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read type field: {}", e)))?;
                item_type = Some(value);
            }
            "text" => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read text field: {}", e)))?;
                text = Some(value);
            }
            "file" => {
                let filename = field.file_name().unwrap_or("").to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read file field: {}", e)))?;

                // Browsers send an empty file part when the input was left blank
                if !filename.is_empty() || !data.is_empty() {
                    file = Some(MediaUpload { filename, data });
                }
            }
            _ => {}
        }
    }

    build_new_item(item_type, text, file)
}

fn build_new_item(
    item_type: Option<String>,
    text: Option<String>,
    file: Option<MediaUpload>,
) -> Result<NewTimelineItem> {
    let raw = item_type.ok_or_else(|| AppError::Validation("Missing item type".to_string()))?;
    let item_type = ItemType::from_str(&raw)
        .ok_or_else(|| AppError::Validation(format!("Invalid item type: {}", raw)))?;
    let text = text.filter(|t| !t.is_empty());

    Ok(NewTimelineItem {
        item_type,
        text,
        file,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_rejects_missing_and_unknown_types() {
        let err = build_new_item(None, None, None).expect_err("missing type");
        assert!(matches!(err, AppError::Validation(_)));

        let err =
            build_new_item(Some("video".to_string()), None, None).expect_err("unknown type");
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn build_normalizes_empty_text() {
        let item = build_new_item(Some("status".to_string()), Some(String::new()), None)
            .expect("build");
        assert_eq!(item.item_type, ItemType::Status);
        assert!(item.text.is_none());

        let item = build_new_item(Some("status".to_string()), Some("hi".to_string()), None)
            .expect("build");
        assert_eq!(item.text.as_deref(), Some("hi"));
    }
}
