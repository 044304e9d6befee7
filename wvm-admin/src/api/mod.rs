//! HTTP API handlers for wvm-admin

pub mod auth;
pub mod categories;
pub mod data;
pub mod export;
pub mod health;
pub mod photo_requests;
pub mod site;
pub mod uploads;
pub mod venues;

pub use auth::{auth_middleware, auth_routes};
pub use categories::category_routes;
pub use data::data_routes;
pub use export::export_routes;
pub use health::health_routes;
pub use photo_requests::{photo_request_admin_routes, photo_request_public_routes};
pub use site::site_routes;
pub use uploads::upload_routes;
pub use venues::venue_routes;

use axum::Json;
use serde_json::{json, Value};

/// Body returned by deletes and other acknowledgement-only calls
pub(crate) fn success() -> Json<Value> {
    Json(json!({ "success": true }))
}
