//! Static site generation

use axum::{extract::State, routing::post, Json, Router};
use serde_json::{json, Value};
use wvm_common::export::export_site;

use crate::{ApiResult, AppState};

/// POST /api/generate-html
///
/// Renders every category page (plus the landing page when configured) into
/// the export directory and returns the filenames written.
pub async fn generate_html(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let files = export_site(
        &state.store,
        &state.layout.template_file(),
        state.layout.export_dir(),
    )
    .await?;
    Ok(Json(json!({ "success": true, "files": files })))
}

pub fn export_routes() -> Router<AppState> {
    Router::new().route("/api/generate-html", post(generate_html))
}
