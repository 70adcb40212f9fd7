//! HTTP and WebSocket request handlers
//!
//! This module organizes the gateway's handlers into logical groups:
//! - `call` - call-setup webhook returning the stream-connect XML
//! - `config_api` - voice settings read/update API
//! - `log_stream` - broadcast-only observer log WebSocket
//! - `media` - telephony media-stream WebSocket

pub mod call;
pub mod config_api;
pub mod log_stream;
pub mod media;

// Re-export commonly used handlers for convenient access
pub use media::media_stream_handler;
