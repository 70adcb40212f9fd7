//! Configuration API.
//!
//! `GET /get-config` returns the current voice settings; `POST
//! /update-config` merges a partial update, persists it, and reports the
//! new values to log observers. Updates never touch sessions that are
//! already running — those hold a snapshot from call start.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use serde_json::json;

use crate::config::{VoiceConfig, VoiceConfigUpdate};
use crate::state::AppState;

/// Return the current voice settings.
pub async fn get_config(State(state): State<Arc<AppState>>) -> Json<VoiceConfig> {
    Json(state.settings.snapshot())
}

/// Merge a partial update into the voice settings and persist the result.
pub async fn update_config(
    State(state): State<Arc<AppState>>,
    Json(update): Json<VoiceConfigUpdate>,
) -> Json<serde_json::Value> {
    let merged = state.settings.update(update).await;

    state.logs.publish("Updated Configuration:");
    state
        .logs
        .publish(format!("SYSTEM_MESSAGE: {}", merged.system_message));
    state.logs.publish(format!("VOICE: {}", merged.voice));
    state
        .logs
        .publish(format!("SILENCE_TIMEOUT: {}", merged.silence_timeout));
    state.logs.publish(format!("THRESHOLD: {}", merged.threshold));

    Json(json!({ "message": "Configuration updated successfully!" }))
}
