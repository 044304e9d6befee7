//! wvm-admin library - venue map admin service
//!
//! Thin HTTP layer over `wvm-common`: every route resolves to one catalog,
//! upload, photo-request or export operation.

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::Router;
use chrono::{DateTime, Utc};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use wvm_common::api::auth::AdminAuth;
use wvm_common::catalog::{CatalogMutator, CatalogStore};
use wvm_common::config::RootLayout;
use wvm_common::files::{UploadArea, MAX_UPLOAD_BYTES};
use wvm_common::photo_requests::PhotoRequestQueue;

pub mod api;
pub mod error;

pub use crate::error::{ApiError, ApiResult};

/// Multipart framing allowance on top of the image itself
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub layout: Arc<RootLayout>,
    pub store: Arc<CatalogStore>,
    pub mutator: Arc<CatalogMutator>,
    pub photo_requests: Arc<PhotoRequestQueue>,
    pub uploads: UploadArea,
    pub auth: Arc<AdminAuth>,
    /// Service startup timestamp for uptime reporting
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    /// Wire the catalog core to one root folder
    ///
    /// Image cleanup deletes real files from the layout's upload area.
    pub fn new(layout: RootLayout, auth: AdminAuth) -> Self {
        let store = Arc::new(CatalogStore::new(layout.data_file()));
        let uploads = UploadArea::new(layout.root());
        let releaser = Arc::new(uploads.clone());

        Self {
            mutator: Arc::new(CatalogMutator::new(store.clone(), releaser.clone())),
            photo_requests: Arc::new(PhotoRequestQueue::new(
                store.clone(),
                uploads.clone(),
                releaser,
            )),
            layout: Arc::new(layout),
            store,
            uploads,
            auth: Arc::new(auth),
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
///
/// Health, login, photo-request submission, exported pages and stored
/// uploads are public; every other `/api` route sits behind the admin
/// session check.
pub fn build_router(state: AppState) -> Router {
    use axum::middleware;

    let protected = Router::new()
        .merge(api::data_routes())
        .merge(api::category_routes())
        .merge(api::venue_routes())
        .merge(api::upload_routes())
        .merge(api::photo_request_admin_routes())
        .merge(api::export_routes())
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            api::auth_middleware,
        ));

    let public = Router::new()
        .merge(api::health_routes())
        .merge(api::auth_routes())
        .merge(api::photo_request_public_routes());

    let upload_dir = ServeDir::new(state.layout.upload_root());

    Router::new()
        .merge(protected)
        .merge(public)
        .merge(api::site_routes())
        .with_state(state)
        .nest_service("/uploads", upload_dir)
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES + MULTIPART_OVERHEAD))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
