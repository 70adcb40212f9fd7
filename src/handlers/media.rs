//! Telephony media-stream endpoint.
//!
//! Upgrades the telephony provider's connection and hands the socket to a
//! relay session. One relay session — and exactly one upstream connection —
//! per accepted socket.

use std::sync::Arc;

use axum::extract::State;
use axum::extract::ws::WebSocketUpgrade;
use axum::response::Response;
use tracing::info;

use crate::core::relay;
use crate::state::AppState;

/// Upgrade a telephony connection and run the relay session.
pub async fn media_stream_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> Response {
    info!("media-stream connection upgrade requested");
    ws.on_upgrade(move |socket| relay::session::run(socket, state))
}
