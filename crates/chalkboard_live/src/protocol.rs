//! Control messages exchanged with browser clients.
//!
//! The client speaks JSON control messages plus raw binary audio frames.
//! Audio frames carry no envelope; everything else is a tagged message.

use serde::{Deserialize, Serialize};

/// Control message from the browser client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ClientEvent {
    /// The user finished speaking; the model should take its turn
    #[serde(rename = "userTurnEnd")]
    UserTurnEnd,
}

/// Control message to the browser client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ServerEvent {
    /// Text produced by the model during its turn
    #[serde(rename = "botText")]
    BotText {
        /// The text fragment
        text: String,
    },
    /// Audio produced by the model during its turn
    #[serde(rename = "botAudio")]
    BotAudio {
        /// Base64-encoded raw audio
        audio: String,
    },
    /// The model finished its turn
    #[serde(rename = "turnComplete")]
    TurnComplete,
    /// The bridge or upstream session failed
    #[serde(rename = "error")]
    Error {
        /// Human-readable description
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_turn_end_wire_form() {
        let event: ClientEvent = serde_json::from_str(r#"{"type": "userTurnEnd"}"#).unwrap();
        assert_eq!(event, ClientEvent::UserTurnEnd);
    }

    #[test]
    fn server_events_use_tagged_wire_form() {
        let json = serde_json::to_string(&ServerEvent::BotText {
            text: "hello".to_string(),
        })
        .unwrap();
        assert_eq!(json, r#"{"type":"botText","text":"hello"}"#);

        let json = serde_json::to_string(&ServerEvent::TurnComplete).unwrap();
        assert_eq!(json, r#"{"type":"turnComplete"}"#);

        let json = serde_json::to_string(&ServerEvent::BotAudio {
            audio: "AAAA".to_string(),
        })
        .unwrap();
        assert!(json.contains("\"type\":\"botAudio\""));
    }

    #[test]
    fn unknown_client_message_is_rejected() {
        assert!(serde_json::from_str::<ClientEvent>(r#"{"type": "selfDestruct"}"#).is_err());
    }
}
