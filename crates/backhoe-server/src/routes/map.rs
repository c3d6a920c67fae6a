//! The coverage map as a standalone SVG.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use serde::Deserialize;

use backhoe_core::content::LOCATIONS;
use backhoe_core::map::{MapRenderer, placeholder_svg};

use crate::state::AppState;

/// Width the home page draws the map at.
pub const DEFAULT_WIDTH: u32 = 1280;

const MIN_WIDTH: u32 = 240;
const MAX_WIDTH: u32 = 3840;

/// Build the map router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/map.svg", get(map_svg))
}

#[derive(Debug, Default, Deserialize)]
struct MapQuery {
    width: Option<u32>,
    /// Location id whose marker is hovered.
    active: Option<String>,
}

async fn map_svg(State(state): State<Arc<AppState>>, Query(query): Query<MapQuery>) -> impl IntoResponse {
    let svg = map_markup(
        &state,
        query.width.unwrap_or(DEFAULT_WIDTH),
        query.active.as_deref(),
    )
    .await;
    ([(header::CONTENT_TYPE, "image/svg+xml")], svg)
}

/// The map at `width`, or the loading placeholder while the atlas is absent.
pub(crate) async fn map_markup(state: &AppState, width: u32, active: Option<&str>) -> String {
    let width = width.clamp(MIN_WIDTH, MAX_WIDTH);
    let Some(atlas) = state.atlas().await else {
        return placeholder_svg(width);
    };
    let renderer = MapRenderer::new(atlas, LOCATIONS.to_vec(), width);
    let hover = active.and_then(|id| renderer.hover(id));
    renderer.render_svg(hover.as_ref())
}
