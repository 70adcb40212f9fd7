//! Upstream realtime service: connection client, event vocabulary, and
//! endpoint configuration.

pub mod client;
pub mod config;
pub mod error;
pub mod messages;

pub use client::{UpstreamConnection, UpstreamIncoming, connect};
pub use config::{DEFAULT_REALTIME_MODEL, OPENAI_REALTIME_URL, SETTLE_DELAY};
pub use error::UpstreamError;
