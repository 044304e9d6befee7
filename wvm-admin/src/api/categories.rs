//! Category CRUD

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use serde_json::Value;
use wvm_common::catalog::{Category, Payload};

use crate::{ApiResult, AppState};

/// GET /api/categories
pub async fn list_categories(State(state): State<AppState>) -> ApiResult<Json<Vec<Category>>> {
    Ok(Json(state.store.load().await?.categories))
}

/// POST /api/categories
pub async fn create_category(
    State(state): State<AppState>,
    Json(payload): Json<Payload>,
) -> ApiResult<(StatusCode, Json<Category>)> {
    let category = state.mutator.create_category(&payload).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

/// PUT /api/categories/:category_id
pub async fn update_category(
    State(state): State<AppState>,
    Path(category_id): Path<String>,
    Json(payload): Json<Payload>,
) -> ApiResult<Json<Category>> {
    Ok(Json(state.mutator.update_category(&category_id, &payload).await?))
}

/// DELETE /api/categories/:category_id
pub async fn delete_category(
    State(state): State<AppState>,
    Path(category_id): Path<String>,
) -> ApiResult<Json<Value>> {
    state.mutator.delete_category(&category_id).await?;
    Ok(super::success())
}

pub fn category_routes() -> Router<AppState> {
    Router::new()
        .route("/api/categories", get(list_categories).post(create_category))
        .route(
            "/api/categories/:category_id",
            put(update_category).delete(delete_category),
        )
}
