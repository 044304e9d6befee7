//! Admin login and the session middleware
//!
//! Clients log in with the admin password and send the issued token as
//! `Authorization: Bearer <token>` on every protected call.

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;
use wvm_common::api::auth::bearer_token;

use crate::{ApiResult, AppState};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub password: String,
}

/// Bearer token from the request headers, if any
fn request_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(bearer_token)
}

/// Rejects protected requests without a live admin session
pub async fn auth_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> ApiResult<Response> {
    let token = request_token(request.headers());
    if let Err(e) = state.auth.authorize(token).await {
        debug!("Rejected {} {}: {}", request.method(), request.uri().path(), e);
        return Err(e.into());
    }
    Ok(next.run(request).await)
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> ApiResult<impl IntoResponse> {
    let token = state.auth.login(&body.password).await?;
    Ok(Json(json!({ "success": true, "token": token })))
}

/// POST /api/auth/logout
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    if let Some(token) = request_token(&headers) {
        state.auth.logout(token).await;
    }
    super::success()
}

/// GET /api/auth/verify
pub async fn verify(State(state): State<AppState>, headers: HeaderMap) -> Response {
    match state.auth.authorize(request_token(&headers)).await {
        Ok(()) => Json(json!({ "valid": true })).into_response(),
        Err(_) => (StatusCode::UNAUTHORIZED, Json(json!({ "valid": false }))).into_response(),
    }
}

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/logout", post(logout))
        .route("/api/auth/verify", get(verify))
}
