//! Configuration module for the coach gateway
//!
//! Two layers of configuration:
//! - [`ServerConfig`]: immutable process settings loaded from the environment
//!   (`.env` supported) — upstream credential, listen port, realtime endpoint.
//! - [`VoiceConfig`] + [`ConfigStore`]: mutable voice/behavior settings read
//!   as a snapshot by every new call session and changed through the HTTP
//!   configuration API, persisted to a JSON file on every update.
//!
//! # Example
//! ```rust,no_run
//! use coach_gateway::config::{ConfigStore, ServerConfig};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ServerConfig::from_env()?;
//! let settings = ConfigStore::load(config.settings_path.clone())?;
//!
//! println!("Server listening on {}", config.address());
//! println!("Voice: {}", settings.snapshot().voice);
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::upstream::{DEFAULT_REALTIME_MODEL, OPENAI_REALTIME_URL};

/// Default listen port when `PORT` is not set.
pub const DEFAULT_PORT: u16 = 5050;

/// Default path of the persisted voice settings file.
pub const DEFAULT_SETTINGS_PATH: &str = "config.json";

/// Default directory served at the HTTP root.
pub const DEFAULT_PUBLIC_DIR: &str = "public";

/// Configuration loading errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The upstream credential is required at startup
    #[error("missing OPENAI_API_KEY in environment")]
    MissingApiKey,
    /// `PORT` was set but is not a valid port number
    #[error("invalid PORT value: {0}")]
    InvalidPort(String),
    /// The settings file exists but could not be read
    #[error("failed to read settings file {path}: {source}")]
    SettingsRead {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The settings file exists but is not valid JSON
    #[error("failed to parse settings file {path}: {source}")]
    SettingsParse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Server configuration
///
/// Loaded once at startup and immutable afterwards. Contains the upstream
/// realtime credential and endpoint, the listen address, and the filesystem
/// paths the gateway works with.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    // Server settings
    pub host: String,
    pub port: u16,

    /// API key for the upstream realtime service (required)
    pub openai_api_key: String,

    /// Realtime WebSocket endpoint; override with `REALTIME_URL` to point
    /// the gateway at a local mock during testing
    pub realtime_url: String,
    /// Realtime model, passed as a query parameter on connect
    pub realtime_model: String,

    /// Path the voice settings are persisted to
    pub settings_path: PathBuf,
    /// Directory served at the HTTP root
    pub public_dir: PathBuf,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// A missing or empty `OPENAI_API_KEY` is fatal; everything else has a
    /// default.
    pub fn from_env() -> Result<Self, ConfigError> {
        let openai_api_key = std::env::var("OPENAI_API_KEY")
            .ok()
            .filter(|key| !key.is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        let port = match std::env::var("PORT") {
            Ok(raw) => raw
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort(raw))?,
            Err(_) => DEFAULT_PORT,
        };

        Ok(Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port,
            openai_api_key,
            realtime_url: std::env::var("REALTIME_URL")
                .unwrap_or_else(|_| OPENAI_REALTIME_URL.to_string()),
            realtime_model: std::env::var("REALTIME_MODEL")
                .unwrap_or_else(|_| DEFAULT_REALTIME_MODEL.to_string()),
            settings_path: PathBuf::from(DEFAULT_SETTINGS_PATH),
            public_dir: PathBuf::from(DEFAULT_PUBLIC_DIR),
        })
    }

    /// Socket address string for the listener.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

// =============================================================================
// Voice Settings
// =============================================================================

/// Mutable voice/behavior settings.
///
/// Field names mirror the persisted JSON document and the configuration API
/// payloads. Every new call session copies these at creation time; a later
/// update never alters a session that is already running.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceConfig {
    /// System instructions for the assistant
    #[serde(rename = "SYSTEM_MESSAGE")]
    pub system_message: String,
    /// Voice used for audio output
    #[serde(rename = "VOICE")]
    pub voice: String,
    /// Silence duration before end of turn (ms)
    #[serde(rename = "SILENCE_TIMEOUT")]
    pub silence_timeout: i64,
    /// Server VAD activation threshold (0.0 to 1.0)
    #[serde(rename = "THRESHOLD")]
    pub threshold: f64,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            system_message: "You are a supportive business coach. Keep your answers short, \
                             practical and encouraging."
                .to_string(),
            voice: "alloy".to_string(),
            silence_timeout: 500,
            threshold: 0.5,
        }
    }
}

/// Partial update accepted by the configuration API.
///
/// Absent or null fields leave the current value unchanged. The numeric
/// fields also accept their string forms and are coerced: `silence_timeout`
/// to an integer, `threshold` to a float.
#[derive(Debug, Default, Deserialize)]
pub struct VoiceConfigUpdate {
    #[serde(default)]
    pub system_message: Option<String>,
    #[serde(default)]
    pub voice: Option<String>,
    #[serde(default)]
    pub silence_timeout: Option<Value>,
    #[serde(default)]
    pub threshold: Option<Value>,
}

fn coerce_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().map(|f| f as i64))
        }
        _ => None,
    }
}

fn coerce_float(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

// =============================================================================
// Settings Store
// =============================================================================

/// Thread-safe store for the mutable voice settings.
///
/// Reads are snapshots. Every successful update is persisted to the settings
/// file; a failed write is logged and the in-memory state kept (no rollback).
#[derive(Debug)]
pub struct ConfigStore {
    inner: RwLock<VoiceConfig>,
    path: PathBuf,
}

impl ConfigStore {
    /// Create a store with explicit initial settings.
    pub fn with_settings(path: impl Into<PathBuf>, settings: VoiceConfig) -> Self {
        Self {
            inner: RwLock::new(settings),
            path: path.into(),
        }
    }

    /// Load settings from `path`.
    ///
    /// A missing file starts from defaults; an unreadable or unparsable file
    /// is a startup error.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let settings = match std::fs::read_to_string(&path) {
            Ok(data) => serde_json::from_str(&data).map_err(|source| ConfigError::SettingsParse {
                path: path.clone(),
                source,
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(
                    "settings file {} not found, starting from defaults",
                    path.display()
                );
                VoiceConfig::default()
            }
            Err(source) => {
                return Err(ConfigError::SettingsRead {
                    path: path.clone(),
                    source,
                });
            }
        };
        Ok(Self {
            inner: RwLock::new(settings),
            path,
        })
    }

    /// Snapshot of the current settings.
    pub fn snapshot(&self) -> VoiceConfig {
        self.inner.read().clone()
    }

    /// Apply a partial update and persist the merged result.
    ///
    /// Returns the merged settings. Fields that fail numeric coercion are
    /// ignored; persistence failure is logged and does not roll back the
    /// in-memory update.
    pub async fn update(&self, update: VoiceConfigUpdate) -> VoiceConfig {
        let merged = {
            let mut settings = self.inner.write();
            if let Some(system_message) = update.system_message {
                settings.system_message = system_message;
            }
            if let Some(voice) = update.voice {
                settings.voice = voice;
            }
            if let Some(value) = update.silence_timeout {
                match coerce_int(&value) {
                    Some(v) => settings.silence_timeout = v,
                    None => tracing::warn!("ignoring non-numeric silence_timeout: {value}"),
                }
            }
            if let Some(value) = update.threshold {
                match coerce_float(&value) {
                    Some(v) => settings.threshold = v,
                    None => tracing::warn!("ignoring non-numeric threshold: {value}"),
                }
            }
            settings.clone()
        };
        self.persist(&merged).await;
        merged
    }

    async fn persist(&self, settings: &VoiceConfig) {
        let payload = match serde_json::to_string_pretty(settings) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::error!("failed to serialize settings: {e}");
                return;
            }
        };
        if let Err(e) = tokio::fs::write(&self.path, payload).await {
            tracing::error!(
                "failed to persist settings to {}: {}",
                self.path.display(),
                e
            );
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
