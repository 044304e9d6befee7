//! Venue, map and location CRUD
//!
//! Children are addressed through their full owning path; an id that does
//! not resolve under the given parent is a 404.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use serde_json::Value;
use wvm_common::catalog::{Location, Map, Payload, Venue};

use crate::{ApiResult, AppState};

// ========================================
// Venues
// ========================================

/// GET /api/venues
pub async fn list_venues(State(state): State<AppState>) -> ApiResult<Json<Vec<Venue>>> {
    Ok(Json(state.store.load().await?.venues))
}

/// POST /api/venues
pub async fn create_venue(
    State(state): State<AppState>,
    Json(payload): Json<Payload>,
) -> ApiResult<(StatusCode, Json<Venue>)> {
    let venue = state.mutator.create_venue(&payload).await?;
    Ok((StatusCode::CREATED, Json(venue)))
}

/// PUT /api/venues/:venue_id
pub async fn update_venue(
    State(state): State<AppState>,
    Path(venue_id): Path<String>,
    Json(payload): Json<Payload>,
) -> ApiResult<Json<Venue>> {
    Ok(Json(state.mutator.update_venue(&venue_id, &payload).await?))
}

/// DELETE /api/venues/:venue_id
pub async fn delete_venue(
    State(state): State<AppState>,
    Path(venue_id): Path<String>,
) -> ApiResult<Json<Value>> {
    state.mutator.delete_venue(&venue_id).await?;
    Ok(super::success())
}

// ========================================
// Maps
// ========================================

/// POST /api/venues/:venue_id/maps
pub async fn create_map(
    State(state): State<AppState>,
    Path(venue_id): Path<String>,
    Json(payload): Json<Payload>,
) -> ApiResult<(StatusCode, Json<Map>)> {
    let map = state.mutator.create_map(&venue_id, &payload).await?;
    Ok((StatusCode::CREATED, Json(map)))
}

/// PUT /api/venues/:venue_id/maps/:map_id
pub async fn update_map(
    State(state): State<AppState>,
    Path((venue_id, map_id)): Path<(String, String)>,
    Json(payload): Json<Payload>,
) -> ApiResult<Json<Map>> {
    Ok(Json(state.mutator.update_map(&venue_id, &map_id, &payload).await?))
}

/// DELETE /api/venues/:venue_id/maps/:map_id
pub async fn delete_map(
    State(state): State<AppState>,
    Path((venue_id, map_id)): Path<(String, String)>,
) -> ApiResult<Json<Value>> {
    state.mutator.delete_map(&venue_id, &map_id).await?;
    Ok(super::success())
}

// ========================================
// Locations
// ========================================

/// POST /api/venues/:venue_id/maps/:map_id/locations
pub async fn create_location(
    State(state): State<AppState>,
    Path((venue_id, map_id)): Path<(String, String)>,
    Json(payload): Json<Payload>,
) -> ApiResult<(StatusCode, Json<Location>)> {
    let location = state
        .mutator
        .create_location(&venue_id, &map_id, &payload)
        .await?;
    Ok((StatusCode::CREATED, Json(location)))
}

/// PUT /api/venues/:venue_id/maps/:map_id/locations/:location_id
pub async fn update_location(
    State(state): State<AppState>,
    Path((venue_id, map_id, location_id)): Path<(String, String, String)>,
    Json(payload): Json<Payload>,
) -> ApiResult<Json<Location>> {
    let location = state
        .mutator
        .update_location(&venue_id, &map_id, &location_id, &payload)
        .await?;
    Ok(Json(location))
}

/// DELETE /api/venues/:venue_id/maps/:map_id/locations/:location_id
pub async fn delete_location(
    State(state): State<AppState>,
    Path((venue_id, map_id, location_id)): Path<(String, String, String)>,
) -> ApiResult<Json<Value>> {
    state
        .mutator
        .delete_location(&venue_id, &map_id, &location_id)
        .await?;
    Ok(super::success())
}

pub fn venue_routes() -> Router<AppState> {
    Router::new()
        .route("/api/venues", get(list_venues).post(create_venue))
        .route("/api/venues/:venue_id", put(update_venue).delete(delete_venue))
        .route("/api/venues/:venue_id/maps", post(create_map))
        .route(
            "/api/venues/:venue_id/maps/:map_id",
            put(update_map).delete(delete_map),
        )
        .route(
            "/api/venues/:venue_id/maps/:map_id/locations",
            post(create_location),
        )
        .route(
            "/api/venues/:venue_id/maps/:map_id/locations/:location_id",
            put(update_location).delete(delete_location),
        )
}
