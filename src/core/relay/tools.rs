//! In-band tool-call interpretation.
//!
//! The model is declared one tool, `suggest_breathing_exercise`. When its
//! arguments complete, the relay synthesizes the exercise text locally and
//! prompts the model to narrate it; no telephony frame is produced here —
//! the narration arrives later as ordinary audio deltas.

use serde_json::{Value, json};

use crate::core::upstream::messages::{ClientEvent, ConversationItem, ResponseConfig, ToolDef};

/// Name of the single tool declared to the model.
pub const TOOL_NAME: &str = "suggest_breathing_exercise";

/// Exercise length used when the model omits or mangles `duration`.
pub const DEFAULT_DURATION_SECS: i64 = 30;

/// Schema for the breathing-exercise tool, declared in the session
/// configuration.
pub fn tool_schema() -> ToolDef {
    ToolDef {
        tool_type: "function".to_string(),
        name: TOOL_NAME.to_string(),
        description: Some("Suggest a simple breathing exercise to help the user relax".to_string()),
        parameters: Some(json!({
            "type": "object",
            "properties": {
                "duration": {
                    "type": "integer",
                    "description": "Duration of the exercise in seconds"
                }
            }
        })),
    }
}

/// Read `duration` out of the raw arguments JSON.
///
/// Absent, null, or non-numeric values fall back to the default. A JSON
/// parse failure is an error the caller recovers from without touching
/// either connection.
pub fn parse_duration(arguments: &str) -> Result<i64, serde_json::Error> {
    let args: Value = serde_json::from_str(arguments)?;
    Ok(args
        .get("duration")
        .and_then(Value::as_i64)
        .unwrap_or(DEFAULT_DURATION_SECS))
}

/// The fixed guidance text narrated to the caller.
pub fn guidance_text(duration: i64) -> String {
    format!(
        "Here's a simple {duration}-second breathing exercise: Breathe in slowly for 4 seconds, \
         hold for 4 seconds, then exhale for 4 seconds. Repeat this cycle for the duration of \
         the exercise."
    )
}

/// Build the two follow-up events that continue the conversation, in order:
/// the tool output item, then the narration request.
pub fn follow_up_events(arguments: &str) -> Result<[ClientEvent; 2], serde_json::Error> {
    let duration = parse_duration(arguments)?;
    let guidance = guidance_text(duration);
    let item = ClientEvent::ConversationItemCreate {
        item: ConversationItem::function_call_output(guidance.clone()),
    };
    let response = ClientEvent::ResponseCreate {
        response: ResponseConfig {
            modalities: Some(vec!["text".to_string(), "audio".to_string()]),
            instructions: Some(format!(
                "Guide the user through the following breathing exercise: {guidance}"
            )),
        },
    };
    Ok([item, response])
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_duration_is_used() {
        assert_eq!(parse_duration(r#"{"duration": 45}"#).unwrap(), 45);
        assert!(guidance_text(45).contains("45-second breathing exercise"));
    }

    #[test]
    fn test_missing_duration_defaults_to_30() {
        assert_eq!(parse_duration("{}").unwrap(), 30);
    }

    #[test]
    fn test_null_and_non_numeric_durations_default_to_30() {
        assert_eq!(parse_duration(r#"{"duration": null}"#).unwrap(), 30);
        assert_eq!(parse_duration(r#"{"duration": "ten"}"#).unwrap(), 30);
        assert_eq!(parse_duration(r#"{"duration": 12.5}"#).unwrap(), 30);
    }

    #[test]
    fn test_malformed_arguments_are_an_error() {
        assert!(parse_duration("{duration: 45").is_err());
        assert!(follow_up_events("not json").is_err());
    }

    #[test]
    fn test_follow_up_events_order_and_content() {
        let [first, second] = follow_up_events(r#"{"duration": 45}"#).unwrap();

        let first = serde_json::to_value(&first).unwrap();
        assert_eq!(first["type"], "conversation.item.create");
        assert_eq!(first["item"]["type"], "function_call_output");
        let output = first["item"]["output"].as_str().unwrap();
        assert!(output.contains("45-second breathing exercise"));
        assert!(output.contains("Breathe in slowly for 4 seconds"));

        let second = serde_json::to_value(&second).unwrap();
        assert_eq!(second["type"], "response.create");
        assert_eq!(second["response"]["modalities"], json!(["text", "audio"]));
        let instructions = second["response"]["instructions"].as_str().unwrap();
        assert!(instructions.starts_with("Guide the user through the following breathing exercise:"));
        assert!(instructions.contains("45-second breathing exercise"));
    }

    #[test]
    fn test_tool_schema_shape() {
        let schema = tool_schema();
        assert_eq!(schema.tool_type, "function");
        assert_eq!(schema.name, TOOL_NAME);
        let parameters = schema.parameters.unwrap();
        assert_eq!(parameters["properties"]["duration"]["type"], "integer");
    }

    #[test]
    fn test_guidance_template_is_stable() {
        assert_eq!(
            guidance_text(30),
            "Here's a simple 30-second breathing exercise: Breathe in slowly for 4 seconds, \
             hold for 4 seconds, then exhale for 4 seconds. Repeat this cycle for the duration \
             of the exercise."
        );
    }
}
