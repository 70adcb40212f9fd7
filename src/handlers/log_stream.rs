//! Observer log stream.
//!
//! Broadcast-only WebSocket: each connected observer receives every relay
//! log event as `{timestamp, message}`. Inbound frames carry no semantics;
//! closing the socket unregisters the observer.

use std::sync::Arc;

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::Response;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info};

use crate::state::AppState;

/// Upgrade an observer connection.
pub async fn log_stream_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> Response {
    ws.on_upgrade(move |socket| stream_logs(socket, state))
}

async fn stream_logs(mut socket: WebSocket, state: Arc<AppState>) {
    info!("observer connected to log stream");
    let mut entries = state.logs.subscribe();

    loop {
        tokio::select! {
            entry = entries.recv() => {
                match entry {
                    Ok(entry) => {
                        let json = match serde_json::to_string(&entry) {
                            Ok(json) => json,
                            Err(e) => {
                                debug!("failed to serialize log entry: {e}");
                                continue;
                            }
                        };
                        if socket.send(Message::Text(json.into())).await.is_err() {
                            break;
                        }
                    }
                    Err(RecvError::Lagged(missed)) => {
                        debug!("observer lagged, {missed} log entries dropped");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
            inbound = socket.recv() => {
                match inbound {
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => {}
                    Some(Err(_)) => break,
                }
            }
        }
    }
    info!("observer disconnected from log stream");
}
