//! Upstream connection error types.

use thiserror::Error;

/// Errors from the upstream session client.
///
/// Any of these is session-fatal: the gateway does not retry a failed or
/// dropped upstream connection, it ends the call.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// The WebSocket connection could not be established
    #[error("failed to connect to realtime endpoint: {0}")]
    ConnectionFailed(String),

    /// The handshake request could not be built
    #[error("failed to build realtime request: {0}")]
    InvalidRequest(String),
}
