//! Shared application state.

use std::sync::Arc;

use crate::broadcast::LogBroadcaster;
use crate::config::{ConfigStore, ServerConfig};

/// State shared by every handler.
#[derive(Debug)]
pub struct AppState {
    /// Immutable process configuration
    pub config: ServerConfig,
    /// Mutable voice settings; each call session snapshots these at start
    pub settings: ConfigStore,
    /// Observer log fan-out
    pub logs: LogBroadcaster,
}

impl AppState {
    /// Create the shared state.
    pub fn new(config: ServerConfig, settings: ConfigStore) -> Arc<Self> {
        Arc::new(Self {
            config,
            settings,
            logs: LogBroadcaster::new(),
        })
    }
}
