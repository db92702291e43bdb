pub mod timeline;

use axum::Json;

/// API landing route
/// GET /
pub async fn welcome() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "message": "Welcome to MedStory API" }))
}
