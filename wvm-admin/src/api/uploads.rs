//! Image uploads for location and map images
//!
//! The multipart `file` field is stored in the upload area and the response
//! carries its relative path, which the client then writes into the
//! location's or map's `image` field.

use axum::{
    body::Bytes,
    extract::{Multipart, State},
    routing::post,
    Json, Router,
};
use serde_json::{json, Value};
use tracing::info;
use wvm_common::files::{UploadKind, MAX_UPLOAD_BYTES};

use crate::{ApiError, ApiResult, AppState};

/// A received file part
pub(crate) struct UploadedFile {
    pub filename: String,
    pub bytes: Bytes,
}

impl UploadedFile {
    /// Read a file part, enforcing the upload size limit
    pub(crate) async fn read(field: axum::extract::multipart::Field<'_>) -> ApiResult<Self> {
        let filename = field.file_name().unwrap_or_default().to_string();
        let bytes = field.bytes().await?;
        if bytes.len() > MAX_UPLOAD_BYTES {
            return Err(ApiError::PayloadTooLarge(
                "File too large. Maximum size is 5MB.".to_string(),
            ));
        }
        Ok(Self { filename, bytes })
    }

    pub(crate) async fn store(&self, state: &AppState, kind: UploadKind) -> ApiResult<String> {
        let relative = state.uploads.store(kind, &self.filename, &self.bytes).await?;
        info!("Stored {:?} upload {}", kind, relative);
        Ok(relative)
    }
}

/// First `file` part of the form
async fn file_field(multipart: &mut Multipart) -> ApiResult<UploadedFile> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some("file") {
            return UploadedFile::read(field).await;
        }
    }
    Err(ApiError::BadRequest("No file provided".to_string()))
}

async fn upload(state: &AppState, mut multipart: Multipart, kind: UploadKind) -> ApiResult<Json<Value>> {
    let file = file_field(&mut multipart).await?;
    let relative = file.store(state, kind).await?;
    Ok(Json(json!({ "success": true, "filename": relative })))
}

/// POST /api/upload
pub async fn upload_location_image(
    State(state): State<AppState>,
    multipart: Multipart,
) -> ApiResult<Json<Value>> {
    upload(&state, multipart, UploadKind::Location).await
}

/// POST /api/upload/map
pub async fn upload_map_image(
    State(state): State<AppState>,
    multipart: Multipart,
) -> ApiResult<Json<Value>> {
    upload(&state, multipart, UploadKind::Map).await
}

pub fn upload_routes() -> Router<AppState> {
    Router::new()
        .route("/api/upload", post(upload_location_image))
        .route("/api/upload/map", post(upload_map_image))
}
