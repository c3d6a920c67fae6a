//! Stylesheet and image files.

use std::path::Path;
use std::sync::Arc;

use axum::http::header;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use tower_http::services::ServeDir;

use backhoe_core::site::{STYLESHEET, STYLESHEET_PATH};

use crate::state::AppState;

/// Build the asset router. Images are served from `<public_dir>/images`.
pub fn router(public_dir: &Path) -> Router<Arc<AppState>> {
    Router::new()
        .route(STYLESHEET_PATH, get(stylesheet))
        .nest_service("/images", ServeDir::new(public_dir.join("images")))
}

async fn stylesheet() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/css; charset=utf-8")], STYLESHEET)
}
