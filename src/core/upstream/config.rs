//! Upstream realtime endpoint constants and session defaults.

use std::time::Duration;

/// OpenAI Realtime API WebSocket endpoint.
pub const OPENAI_REALTIME_URL: &str = "wss://api.openai.com/v1/realtime";

/// Realtime model the gateway pins by default.
pub const DEFAULT_REALTIME_MODEL: &str = "gpt-4o-realtime-preview-2024-10-01";

/// Beta protocol version header required by the Realtime API.
pub const OPENAI_BETA_HEADER: &str = "OpenAI-Beta";

/// Value of the beta protocol version header.
pub const OPENAI_BETA_VALUE: &str = "realtime=v1";

/// Narrowband telephony codec used for both audio directions. Payloads are
/// forwarded opaquely in this encoding; the gateway never transcodes.
pub const TELEPHONY_AUDIO_FORMAT: &str = "g711_ulaw";

/// Delay between the upstream socket opening and the configuration message,
/// letting the remote session initialize before it accepts configuration.
pub const SETTLE_DELAY: Duration = Duration::from_millis(250);

/// Sampling temperature pinned for coaching responses.
pub const RESPONSE_TEMPERATURE: f64 = 0.7;
