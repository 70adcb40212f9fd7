//! Stateless event translation between the two wire vocabularies.
//!
//! The translator maps telephony frames to realtime client events and
//! realtime server events to telephony frames. It holds no state: the one
//! piece of per-call context it needs, the stream identifier, is passed in
//! by the session.

use base64::prelude::*;

use crate::core::telephony::messages::{MediaPayload, OutboundMedia, TelephonyOutbound};
use crate::core::upstream::messages::{ClientEvent, ServerEvent};

/// Disposition of one upstream event.
#[derive(Debug, Clone, PartialEq)]
pub enum UpstreamDisposition {
    /// Forward as a telephony media frame.
    Forward(TelephonyOutbound),
    /// Hand to the tool-call interpreter.
    ToolCall {
        /// Tool name, when the service included one
        name: Option<String>,
        /// Raw arguments JSON
        arguments: String,
    },
    /// Log under the given event type; nothing is forwarded.
    Observe(&'static str),
    /// Silently ignored.
    Ignore,
}

/// Map one upstream event to its relay action.
///
/// Audio deltas are dropped while the stream identifier is still unknown: a
/// telephony frame is never emitted without a populated `streamSid`.
pub fn translate_upstream(event: ServerEvent, stream_sid: Option<&str>) -> UpstreamDisposition {
    match event {
        ServerEvent::ResponseAudioDelta { delta } if !delta.is_empty() => match stream_sid {
            Some(sid) => UpstreamDisposition::Forward(audio_frame(sid, &delta)),
            None => UpstreamDisposition::Ignore,
        },
        ServerEvent::ResponseAudioDelta { .. } => UpstreamDisposition::Ignore,
        ServerEvent::FunctionCallArgumentsDone { name, arguments } => {
            UpstreamDisposition::ToolCall { name, arguments }
        }
        ServerEvent::SessionUpdated => UpstreamDisposition::Observe("session.updated"),
        ServerEvent::SessionCreated => UpstreamDisposition::Observe("session.created"),
        ServerEvent::ResponseContentDone => UpstreamDisposition::Observe("response.content.done"),
        ServerEvent::RateLimitsUpdated => UpstreamDisposition::Observe("rate_limits.updated"),
        ServerEvent::ResponseDone => UpstreamDisposition::Observe("response.done"),
        ServerEvent::InputAudioBufferCommitted => {
            UpstreamDisposition::Observe("input_audio_buffer.committed")
        }
        ServerEvent::SpeechStopped => {
            UpstreamDisposition::Observe("input_audio_buffer.speech_stopped")
        }
        ServerEvent::SpeechStarted => {
            UpstreamDisposition::Observe("input_audio_buffer.speech_started")
        }
        ServerEvent::Other => UpstreamDisposition::Ignore,
    }
}

/// Build an outbound telephony media frame.
///
/// The payload round-trips through a base64 decode and re-encode, which for
/// a valid payload is an identity transform. A payload that fails to decode
/// is forwarded untouched; the transform is cosmetic and must never drop
/// audio.
pub fn audio_frame(stream_sid: &str, delta: &str) -> TelephonyOutbound {
    let payload = match BASE64_STANDARD.decode(delta) {
        Ok(bytes) => BASE64_STANDARD.encode(bytes),
        Err(_) => delta.to_string(),
    };
    TelephonyOutbound::Media {
        stream_sid: stream_sid.to_string(),
        media: OutboundMedia { payload },
    }
}

/// Map caller audio to an upstream append event, payload unchanged.
pub fn append_audio(media: MediaPayload) -> ClientEvent {
    ClientEvent::InputAudioBufferAppend {
        audio: media.payload,
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn delta_event(delta: &str) -> ServerEvent {
        ServerEvent::ResponseAudioDelta {
            delta: delta.to_string(),
        }
    }

    #[test]
    fn test_audio_delta_without_stream_sid_is_dropped() {
        let disposition = translate_upstream(delta_event("dGVzdA=="), None);
        assert_eq!(disposition, UpstreamDisposition::Ignore);
    }

    #[test]
    fn test_audio_delta_with_stream_sid_is_forwarded() {
        let disposition = translate_upstream(delta_event("dGVzdA=="), Some("MZ1234"));
        match disposition {
            UpstreamDisposition::Forward(TelephonyOutbound::Media { stream_sid, media }) => {
                assert_eq!(stream_sid, "MZ1234");
                assert_eq!(media.payload, "dGVzdA==");
            }
            other => panic!("Expected Forward, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_audio_delta_is_ignored() {
        let disposition = translate_upstream(delta_event(""), Some("MZ1234"));
        assert_eq!(disposition, UpstreamDisposition::Ignore);
    }

    #[test]
    fn test_base64_round_trip_is_identity() {
        let encoded = BASE64_STANDARD.encode(b"\x00\x7f\x80\xff narrowband audio");
        let frame = audio_frame("MZ1234", &encoded);
        let TelephonyOutbound::Media { media, .. } = frame;
        assert_eq!(media.payload, encoded);
    }

    #[test]
    fn test_undecodable_payload_is_forwarded_untouched() {
        let frame = audio_frame("MZ1234", "not%%base64");
        let TelephonyOutbound::Media { media, .. } = frame;
        assert_eq!(media.payload, "not%%base64");
    }

    #[test]
    fn test_function_call_routes_to_tool_interpreter() {
        let event = ServerEvent::FunctionCallArgumentsDone {
            name: None,
            arguments: r#"{"duration": 45}"#.to_string(),
        };
        let disposition = translate_upstream(event, Some("MZ1234"));
        assert_eq!(
            disposition,
            UpstreamDisposition::ToolCall {
                name: None,
                arguments: r#"{"duration": 45}"#.to_string(),
            }
        );
    }

    #[test]
    fn test_observability_set_is_logged_only() {
        let cases = [
            (ServerEvent::SessionCreated, "session.created"),
            (ServerEvent::SessionUpdated, "session.updated"),
            (ServerEvent::ResponseContentDone, "response.content.done"),
            (ServerEvent::RateLimitsUpdated, "rate_limits.updated"),
            (ServerEvent::ResponseDone, "response.done"),
            (
                ServerEvent::InputAudioBufferCommitted,
                "input_audio_buffer.committed",
            ),
            (
                ServerEvent::SpeechStopped,
                "input_audio_buffer.speech_stopped",
            ),
            (
                ServerEvent::SpeechStarted,
                "input_audio_buffer.speech_started",
            ),
        ];
        for (event, expected) in cases {
            assert_eq!(
                translate_upstream(event, Some("MZ1234")),
                UpstreamDisposition::Observe(expected)
            );
        }
    }

    #[test]
    fn test_unknown_event_is_silently_ignored() {
        let event: ServerEvent =
            serde_json::from_str(r#"{"type": "conversation.item.truncated"}"#).unwrap();
        assert_eq!(
            translate_upstream(event, Some("MZ1234")),
            UpstreamDisposition::Ignore
        );
    }

    #[test]
    fn test_caller_audio_maps_to_append() {
        let event = append_audio(MediaPayload {
            payload: "dGVzdA==".to_string(),
        });
        assert_eq!(
            event,
            ClientEvent::InputAudioBufferAppend {
                audio: "dGVzdA==".to_string(),
            }
        );
    }
}
