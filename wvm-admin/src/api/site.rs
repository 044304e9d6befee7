//! Serving the exported pages
//!
//! Only top-level `.html` files of the export directory are reachable, so
//! the catalog document next to them is never served.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use tracing::warn;
use wvm_common::export::LANDING_FILENAME;

use crate::AppState;

fn is_page_name(page: &str) -> bool {
    page.ends_with(".html")
        && !page.starts_with('.')
        && page
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

async fn serve(state: &AppState, page: &str) -> Response {
    if !is_page_name(page) {
        return StatusCode::NOT_FOUND.into_response();
    }
    match tokio::fs::read_to_string(state.layout.export_dir().join(page)).await {
        Ok(html) => Html(html).into_response(),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => StatusCode::NOT_FOUND.into_response(),
        Err(e) => {
            warn!("Failed to read exported page {}: {}", page, e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// GET /
pub async fn serve_landing(State(state): State<AppState>) -> Response {
    serve(&state, LANDING_FILENAME).await
}

/// GET /:page
pub async fn serve_page(State(state): State<AppState>, Path(page): Path<String>) -> Response {
    serve(&state, &page).await
}

pub fn site_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(serve_landing))
        .route("/:page", get(serve_page))
}
