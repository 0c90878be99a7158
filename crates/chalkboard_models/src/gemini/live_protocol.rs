//! Message types for the Gemini Live API WebSocket protocol.
//!
//! # Protocol Overview
//!
//! 1. Client connects to WebSocket endpoint
//! 2. Client sends `SetupMessage` with model and configuration
//! 3. Server responds with `setupComplete`
//! 4. Client streams audio via `RealtimeInputMessage` and signals turn ends
//!    with `ClientContentMessage`; server streams model turns back
//! 5. Connection closes when done

use serde::{Deserialize, Serialize};

//
// ─── CLIENT MESSAGES ────────────────────────────────────────────────────────
//

/// Initial setup message sent immediately after WebSocket connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct SetupMessage {
    pub setup: SetupConfig,
}

/// Configuration for the Live API session.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub(super) struct SetupConfig {
    /// Model to use (e.g., "models/gemini-2.0-flash-live-001")
    pub model: String,

    /// Generation parameters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

/// Generation configuration parameters.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub(super) struct GenerationConfig {
    /// Maximum tokens to generate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<i32>,

    /// Temperature for sampling (0.0 - 2.0)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,

    /// Response modalities (e.g., ["TEXT"], ["AUDIO"])
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_modalities: Option<Vec<String>>,
}

/// Client content message for conversation turns.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ClientContentMessage {
    pub client_content: ClientContent,
}

/// Client conversation content.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ClientContent {
    /// Conversation turns
    pub turns: Vec<Turn>,

    /// Whether this turn is complete
    pub turn_complete: bool,
}

/// A single conversation turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct Turn {
    /// Role ("user", "model")
    pub role: String,

    /// Content parts
    pub parts: Vec<Part>,
}

/// Content part (text, inline data, etc.).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub(super) enum Part {
    /// Text content
    Text(TextPart),
    /// Inline data (images, audio, etc.)
    InlineData(InlineDataPart),
}

/// Text content part.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(super) struct TextPart {
    pub text: String,
}

/// Inline data content part.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct InlineDataPart {
    pub inline_data: InlineData,
}

/// Inline data with MIME type.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct InlineData {
    pub mime_type: String,
    pub data: String, // base64-encoded
}

/// Realtime input message for streaming audio.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct RealtimeInputMessage {
    pub realtime_input: RealtimeInput,
}

/// Realtime input data.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct RealtimeInput {
    pub media_chunks: Vec<MediaChunk>,
}

/// Media chunk for streaming.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct MediaChunk {
    pub mime_type: String,
    pub data: String, // base64-encoded
}

//
// ─── SERVER MESSAGES ────────────────────────────────────────────────────────
//

/// Server message (received from WebSocket).
///
/// Contains exactly one of the message type fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ServerMessage {
    /// Setup confirmation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub setup_complete: Option<SetupComplete>,

    /// Model-generated content
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_content: Option<ServerContent>,

    /// Disconnect warning
    #[serde(skip_serializing_if = "Option::is_none")]
    pub go_away: Option<GoAway>,
}

/// Setup complete confirmation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(super) struct SetupComplete {}

/// Server content (model response).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ServerContent {
    /// Model turn content
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_turn: Option<ModelTurn>,

    /// Whether this turn is complete
    #[serde(default)]
    pub turn_complete: bool,
}

/// Model turn content.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ModelTurn {
    /// Content parts
    #[serde(default)]
    pub parts: Vec<Part>,
}

/// Server disconnect warning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct GoAway {
    pub reason: String,
}

//
// ─── HELPER IMPLEMENTATIONS ─────────────────────────────────────────────────
//

impl Part {
    /// Create a text part.
    pub fn text(text: impl Into<String>) -> Self {
        Part::Text(TextPart { text: text.into() })
    }

    /// Extract text from a part, if it contains text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Part::Text(TextPart { text }) => Some(text),
            _ => None,
        }
    }

    /// Extract base64 inline data from a part, if present.
    pub fn as_inline_data(&self) -> Option<&InlineData> {
        match self {
            Part::InlineData(InlineDataPart { inline_data }) => Some(inline_data),
            _ => None,
        }
    }
}

impl ServerMessage {
    /// Check if this is a setup complete message.
    pub fn is_setup_complete(&self) -> bool {
        self.setup_complete.is_some()
    }

    /// Check if this is a go away (disconnect) message.
    pub fn is_go_away(&self) -> bool {
        self.go_away.is_some()
    }

    /// Extract text from server content, if present.
    pub fn extract_text(&self) -> Option<String> {
        let parts = &self.server_content.as_ref()?.model_turn.as_ref()?.parts;
        let text: String = parts.iter().filter_map(|part| part.as_text()).collect();
        if text.is_empty() { None } else { Some(text) }
    }

    /// Extract base64 inline audio from server content, if present.
    pub fn extract_inline_data(&self) -> Option<&InlineData> {
        self.server_content
            .as_ref()?
            .model_turn
            .as_ref()?
            .parts
            .iter()
            .find_map(|part| part.as_inline_data())
    }

    /// Check if the turn is complete.
    pub fn is_turn_complete(&self) -> bool {
        self.server_content
            .as_ref()
            .map(|content| content.turn_complete)
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn setup_message_serialization() {
        let msg = SetupMessage {
            setup: SetupConfig {
                model: "models/gemini-2.0-flash-live-001".to_string(),
                generation_config: Some(GenerationConfig {
                    response_modalities: Some(vec!["AUDIO".to_string(), "TEXT".to_string()]),
                    ..Default::default()
                }),
            },
        };

        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"model\":\"models/gemini-2.0-flash-live-001\""));
        assert!(json.contains("\"responseModalities\""));
    }

    #[test]
    fn turn_end_serialization() {
        let msg = ClientContentMessage {
            client_content: ClientContent {
                turns: vec![],
                turn_complete: true,
            },
        };

        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"turnComplete\":true"));
    }

    #[test]
    fn server_message_deserialization_setup_complete() {
        let json = r#"{"setupComplete": {}}"#;
        let msg: ServerMessage = serde_json::from_str(json).unwrap();
        assert!(msg.is_setup_complete());
    }

    #[test]
    fn server_message_extracts_text_and_audio() {
        let json = r#"{
            "serverContent": {
                "modelTurn": {
                    "parts": [
                        {"text": "Hello there"},
                        {"inlineData": {"mimeType": "audio/pcm", "data": "AAAA"}}
                    ]
                },
                "turnComplete": true
            }
        }"#;

        let msg: ServerMessage = serde_json::from_str(json).unwrap();
        assert_eq!(msg.extract_text().unwrap(), "Hello there");
        assert_eq!(msg.extract_inline_data().unwrap().data, "AAAA");
        assert!(msg.is_turn_complete());
    }

    #[test]
    fn turn_complete_without_model_turn_parses() {
        let json = r#"{"serverContent": {"turnComplete": true}}"#;
        let msg: ServerMessage = serde_json::from_str(json).unwrap();
        assert!(msg.is_turn_complete());
        assert!(msg.extract_text().is_none());
    }
}
