//! HTTP route configuration.

use std::sync::Arc;

use axum::Router;
use axum::routing::{any, get, post};
use tower_http::trace::TraceLayer;

use crate::handlers::{call, config_api};
use crate::state::AppState;

/// Create the HTTP API router.
///
/// # Endpoints
///
/// - `ANY /incoming-call` - call-setup webhook (XML stream-connect)
/// - `GET /get-config` - current voice settings
/// - `POST /update-config` - partial settings update, persisted
pub fn create_api_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/incoming-call", any(call::incoming_call))
        .route("/get-config", get(config_api::get_config))
        .route("/update-config", post(config_api::update_config))
        .layer(TraceLayer::new_for_http())
}
