//! WebSocket route configuration.
//!
//! `GET /media-stream` — telephony audio relay; one relay session per
//! connection, paired with exactly one upstream realtime connection.
//!
//! `GET /log-stream` — broadcast-only observer feed; every relay log event
//! is pushed as `{timestamp, message}`.

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tower_http::trace::TraceLayer;

use crate::handlers::{log_stream, media};
use crate::state::AppState;

/// Create the WebSocket router.
pub fn create_ws_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/media-stream", get(media::media_stream_handler))
        .route("/log-stream", get(log_stream::log_stream_handler))
        .layer(TraceLayer::new_for_http())
}
