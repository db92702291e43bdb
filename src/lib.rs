//! MedStory: a personal medical timeline service with pluggable media storage.

pub mod client;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod services;
pub mod storage;

use std::sync::Arc;

use axum::http::HeaderValue;
use axum::routing::get;
use axum::Router;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::db::Database;
use crate::storage::StorageProvider;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub config: Arc<Config>,
    pub storage: Arc<dyn StorageProvider>,
}

pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config);

    // Both spellings of the collection route are registered explicitly;
    // axum does not redirect trailing slashes.
    let mut app = Router::new()
        .route("/", get(handlers::welcome))
        .route(
            "/api/timeline",
            get(handlers::timeline::list_items).post(handlers::timeline::create_item),
        )
        .route(
            "/api/timeline/",
            get(handlers::timeline::list_items).post(handlers::timeline::create_item),
        )
        .route("/api/timeline/:id", get(handlers::timeline::get_item));

    // Media is served straight from disk for the local backend; the s3
    // backend hands out URLs pointing at the object store instead.
    if state.storage.backend() == "local" {
        app = app.nest_service(
            "/media",
            ServeDir::new(&state.config.storage.local.media_dir),
        );
    }

    app.layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn cors_layer(config: &Config) -> CorsLayer {
    let origins = config.cors.origin_list();
    if origins.iter().any(|o| o == "*") {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let origins: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}
