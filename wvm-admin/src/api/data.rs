//! Whole-document read and replace

use axum::{extract::State, routing::get, Json, Router};
use serde_json::Value;
use wvm_common::catalog::Catalog;

use crate::{ApiResult, AppState};

/// GET /api/data
pub async fn get_data(State(state): State<AppState>) -> ApiResult<Json<Catalog>> {
    Ok(Json(state.store.load().await?))
}

/// PUT or POST /api/data
///
/// Replaces the document wholesale; images it no longer references are released.
pub async fn replace_data(
    State(state): State<AppState>,
    Json(document): Json<Catalog>,
) -> ApiResult<Json<Value>> {
    state.mutator.replace_document(document).await?;
    Ok(super::success())
}

pub fn data_routes() -> Router<AppState> {
    Router::new().route(
        "/api/data",
        get(get_data).put(replace_data).post(replace_data),
    )
}
