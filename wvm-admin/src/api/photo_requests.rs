//! Photo-request submission (public) and review (admin)

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use serde_json::{Map as JsonMap, Value};
use wvm_common::catalog::{Location, PhotoRequest};
use wvm_common::files::UploadKind;
use wvm_common::photo_requests::PhotoRequestSubmission;

use super::uploads::UploadedFile;
use crate::{ApiError, ApiResult, AppState};

/// POST /api/photo-requests
///
/// Multipart form with the target ids, the display names and an optional
/// `photo` (or `file`) part. The photo is stored before the request is queued.
pub async fn submit_photo_request(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<(StatusCode, Json<PhotoRequest>)> {
    let mut fields = JsonMap::new();
    let mut photo = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        if field.file_name().is_some() {
            if name == "photo" || name == "file" {
                photo = Some(UploadedFile::read(field).await?);
            }
            continue;
        }
        fields.insert(name, Value::String(field.text().await?));
    }

    let mut submission: PhotoRequestSubmission = serde_json::from_value(Value::Object(fields))
        .map_err(|e| ApiError::BadRequest(format!("Invalid photo request: {}", e)))?;

    if let Some(file) = photo.filter(|f| !f.filename.is_empty()) {
        submission.uploaded_photo = Some(file.store(&state, UploadKind::PhotoRequest).await?);
    } else {
        submission.uploaded_photo = None;
    }

    let request = state.photo_requests.submit(submission).await?;
    Ok((StatusCode::CREATED, Json(request)))
}

/// GET /api/photo-requests
pub async fn list_photo_requests(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<PhotoRequest>>> {
    Ok(Json(state.photo_requests.pending().await?))
}

/// POST /api/photo-requests/:request_id/approve
pub async fn approve_photo_request(
    State(state): State<AppState>,
    Path(request_id): Path<String>,
) -> ApiResult<Json<Location>> {
    Ok(Json(state.photo_requests.approve(&request_id).await?))
}

/// DELETE /api/photo-requests/:request_id
pub async fn dismiss_photo_request(
    State(state): State<AppState>,
    Path(request_id): Path<String>,
) -> ApiResult<Json<Value>> {
    state.photo_requests.dismiss(&request_id).await?;
    Ok(super::success())
}

pub fn photo_request_public_routes() -> Router<AppState> {
    Router::new().route("/api/photo-requests", post(submit_photo_request))
}

pub fn photo_request_admin_routes() -> Router<AppState> {
    Router::new()
        .route("/api/photo-requests", get(list_photo_requests))
        .route(
            "/api/photo-requests/:request_id/approve",
            post(approve_photo_request),
        )
        .route("/api/photo-requests/:request_id", delete(dismiss_photo_request))
}
