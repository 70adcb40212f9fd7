//! Realtime API WebSocket message types.
//!
//! Client events (sent upstream):
//! - session.update - one-shot session configuration
//! - input_audio_buffer.append - append caller audio to the input buffer
//! - conversation.item.create - add an item to the conversation
//! - response.create - request a model response
//!
//! Server events (received): only the types the relay acts on are modeled.
//! Every other tag deserializes into the [`ServerEvent::Other`] arm and is
//! silently ignored, keeping the gateway forward compatible with event
//! types it has never seen.

use serde::{Deserialize, Serialize};

// =============================================================================
// Session Configuration
// =============================================================================

/// Session configuration carried by `session.update`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Turn detection configuration
    pub turn_detection: TurnDetection,
    /// Input audio format
    pub input_audio_format: String,
    /// Output audio format
    pub output_audio_format: String,
    /// Voice for audio output
    pub voice: String,
    /// System instructions for the assistant
    pub instructions: String,
    /// Tool definitions declared to the model
    pub tools: Vec<ToolDef>,
    /// Response modalities
    pub modalities: Vec<String>,
    /// Sampling temperature
    pub temperature: f64,
}

/// Turn detection configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TurnDetection {
    /// Server-side voice activity detection
    #[serde(rename = "server_vad")]
    ServerVad {
        /// Activation threshold (0.0 to 1.0)
        threshold: f64,
        /// Silence duration before end of turn (ms)
        silence_duration_ms: i64,
    },
}

/// Tool definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDef {
    /// Tool type (always "function")
    #[serde(rename = "type")]
    pub tool_type: String,
    /// Function name
    pub name: String,
    /// Function description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Function parameters JSON schema
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<serde_json::Value>,
}

// =============================================================================
// Conversation Items
// =============================================================================

/// Conversation item for `conversation.item.create`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationItem {
    /// Item type
    #[serde(rename = "type")]
    pub item_type: String,
    /// Function output for a `function_call_output` item
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
}

impl ConversationItem {
    /// Item carrying a locally produced tool result back to the conversation.
    pub fn function_call_output(output: impl Into<String>) -> Self {
        Self {
            item_type: "function_call_output".to_string(),
            output: Some(output.into()),
        }
    }
}

/// Response configuration for `response.create`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseConfig {
    /// Response modalities
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modalities: Option<Vec<String>>,
    /// Instructions for this response
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
}

// =============================================================================
// Client Events (sent to the realtime service)
// =============================================================================

/// Client events sent to the realtime service.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum ClientEvent {
    /// Configure the session
    #[serde(rename = "session.update")]
    SessionUpdate {
        /// Session configuration
        session: SessionConfig,
    },

    /// Append audio to the input buffer
    #[serde(rename = "input_audio_buffer.append")]
    InputAudioBufferAppend {
        /// Base64-encoded audio data
        audio: String,
    },

    /// Create a conversation item
    #[serde(rename = "conversation.item.create")]
    ConversationItemCreate {
        /// Item to create
        item: ConversationItem,
    },

    /// Request a model response
    #[serde(rename = "response.create")]
    ResponseCreate {
        /// Response configuration
        response: ResponseConfig,
    },
}

// =============================================================================
// Server Events (received from the realtime service)
// =============================================================================

/// Server events received from the realtime service.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type")]
pub enum ServerEvent {
    /// Audio data chunk for the caller
    #[serde(rename = "response.audio.delta")]
    ResponseAudioDelta {
        /// Base64-encoded audio delta
        #[serde(default)]
        delta: String,
    },

    /// Completed tool-call arguments
    #[serde(rename = "response.function_call_arguments.done")]
    FunctionCallArgumentsDone {
        /// Tool name, when the service includes it
        #[serde(default)]
        name: Option<String>,
        /// Full arguments as a JSON string
        #[serde(default)]
        arguments: String,
    },

    /// Session configuration acknowledged
    #[serde(rename = "session.updated")]
    SessionUpdated,

    /// Session created
    #[serde(rename = "session.created")]
    SessionCreated,

    /// Content generation finished
    #[serde(rename = "response.content.done")]
    ResponseContentDone,

    /// Rate limit headroom changed
    #[serde(rename = "rate_limits.updated")]
    RateLimitsUpdated,

    /// Response finished
    #[serde(rename = "response.done")]
    ResponseDone,

    /// Input audio buffer committed
    #[serde(rename = "input_audio_buffer.committed")]
    InputAudioBufferCommitted,

    /// VAD detected end of caller speech
    #[serde(rename = "input_audio_buffer.speech_stopped")]
    SpeechStopped,

    /// VAD detected caller speech
    #[serde(rename = "input_audio_buffer.speech_started")]
    SpeechStarted,

    /// Forward compatibility: any other tag is ignored.
    #[serde(other)]
    Other,
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_event_type_tags() {
        let event = ClientEvent::InputAudioBufferAppend {
            audio: "dGVzdA==".to_string(),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains(r#""type":"input_audio_buffer.append""#));
        assert!(json.contains(r#""audio":"dGVzdA==""#));
    }

    #[test]
    fn test_session_update_serialization() {
        let event = ClientEvent::SessionUpdate {
            session: SessionConfig {
                turn_detection: TurnDetection::ServerVad {
                    threshold: 0.5,
                    silence_duration_ms: 500,
                },
                input_audio_format: "g711_ulaw".to_string(),
                output_audio_format: "g711_ulaw".to_string(),
                voice: "alloy".to_string(),
                instructions: "Be helpful".to_string(),
                tools: vec![],
                modalities: vec!["text".to_string(), "audio".to_string()],
                temperature: 0.7,
            },
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "session.update");
        assert_eq!(json["session"]["turn_detection"]["type"], "server_vad");
        assert_eq!(json["session"]["turn_detection"]["threshold"], 0.5);
        assert_eq!(json["session"]["temperature"], 0.7);
    }

    #[test]
    fn test_function_call_output_item() {
        let event = ClientEvent::ConversationItemCreate {
            item: ConversationItem::function_call_output("done"),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "conversation.item.create");
        assert_eq!(json["item"]["type"], "function_call_output");
        assert_eq!(json["item"]["output"], "done");
    }

    #[test]
    fn test_audio_delta_deserialization() {
        let json = r#"{
            "type": "response.audio.delta",
            "response_id": "resp_1",
            "item_id": "item_1",
            "output_index": 0,
            "content_index": 0,
            "delta": "dGVzdA=="
        }"#;
        let event: ServerEvent = serde_json::from_str(json).unwrap();
        match event {
            ServerEvent::ResponseAudioDelta { delta } => assert_eq!(delta, "dGVzdA=="),
            _ => panic!("Expected ResponseAudioDelta variant"),
        }
    }

    #[test]
    fn test_function_call_arguments_done_deserialization() {
        let json = r#"{
            "type": "response.function_call_arguments.done",
            "call_id": "call_1",
            "arguments": "{\"duration\": 45}"
        }"#;
        let event: ServerEvent = serde_json::from_str(json).unwrap();
        match event {
            ServerEvent::FunctionCallArgumentsDone { name, arguments } => {
                assert!(name.is_none());
                assert_eq!(arguments, r#"{"duration": 45}"#);
            }
            _ => panic!("Expected FunctionCallArgumentsDone variant"),
        }
    }

    #[test]
    fn test_unit_variants_tolerate_extra_fields() {
        let json = r#"{"type": "session.created", "session": {"id": "sess_1"}}"#;
        let event: ServerEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event, ServerEvent::SessionCreated);
    }

    #[test]
    fn test_unknown_event_type_is_ignored() {
        let json = r#"{"type": "response.some_future_event", "payload": 42}"#;
        let event: ServerEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event, ServerEvent::Other);
    }
}
