//! Telephony media-stream frame vocabulary
//!
//! Frames on the telephony WebSocket are JSON objects tagged by an `event`
//! field. Only `start` and `media` carry relay semantics; every other tag
//! deserializes into the [`TelephonyEvent::Other`] arm and is logged only.

use serde::{Deserialize, Serialize};

// =============================================================================
// Inbound Frames (telephony -> gateway)
// =============================================================================

/// Inbound frames from the telephony connection.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "event")]
pub enum TelephonyEvent {
    /// Stream metadata; carries the stream identifier required for every
    /// outbound media frame on this connection.
    #[serde(rename = "start")]
    Start {
        /// Start payload
        start: StreamStart,
    },

    /// One chunk of caller audio, base64 encoded.
    #[serde(rename = "media")]
    Media {
        /// Media payload
        media: MediaPayload,
    },

    /// Any other tag: no forwarding action.
    #[serde(other)]
    Other,
}

/// Payload of a `start` frame.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StreamStart {
    /// Stream identifier assigned by the telephony side
    #[serde(rename = "streamSid")]
    pub stream_sid: String,
}

/// Payload of a `media` frame.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MediaPayload {
    /// Base64-encoded audio bytes, forwarded opaquely
    pub payload: String,
}

// =============================================================================
// Outbound Frames (gateway -> telephony)
// =============================================================================

/// Outbound frames to the telephony connection.
///
/// A media frame cannot be constructed before the `start` event has
/// delivered the stream identifier.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event")]
pub enum TelephonyOutbound {
    /// One chunk of AI audio for the caller.
    #[serde(rename = "media")]
    Media {
        /// Stream identifier from the `start` event
        #[serde(rename = "streamSid")]
        stream_sid: String,
        /// Media payload
        media: OutboundMedia,
    },
}

/// Media body of an outbound frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutboundMedia {
    /// Base64-encoded audio bytes
    pub payload: String,
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_frame_deserialization() {
        let json = r#"{"event": "start", "start": {"streamSid": "MZ1234", "accountSid": "AC9"}}"#;
        let event: TelephonyEvent = serde_json::from_str(json).unwrap();
        match event {
            TelephonyEvent::Start { start } => assert_eq!(start.stream_sid, "MZ1234"),
            _ => panic!("Expected Start variant"),
        }
    }

    #[test]
    fn test_media_frame_deserialization() {
        let json = r#"{"event": "media", "media": {"payload": "dGVzdA=="}}"#;
        let event: TelephonyEvent = serde_json::from_str(json).unwrap();
        match event {
            TelephonyEvent::Media { media } => assert_eq!(media.payload, "dGVzdA=="),
            _ => panic!("Expected Media variant"),
        }
    }

    #[test]
    fn test_unknown_event_tag_is_ignored() {
        let json = r#"{"event": "mark", "mark": {"name": "checkpoint"}}"#;
        let event: TelephonyEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event, TelephonyEvent::Other);
    }

    #[test]
    fn test_outbound_media_serialization() {
        let frame = TelephonyOutbound::Media {
            stream_sid: "MZ1234".to_string(),
            media: OutboundMedia {
                payload: "dGVzdA==".to_string(),
            },
        };
        let json = serde_json::to_string(&frame).unwrap();
        assert!(json.contains(r#""event":"media""#));
        assert!(json.contains(r#""streamSid":"MZ1234""#));
        assert!(json.contains(r#""payload":"dGVzdA==""#));
    }
}
