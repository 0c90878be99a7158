//! WebSocket client for the Gemini Live API.
//!
//! This module provides a WebSocket-based client for the Gemini Live API,
//! enabling bidirectional streaming communication with Gemini models.
//!
//! # Architecture
//!
//! - `GeminiLiveClient` - Factory for creating WebSocket sessions
//! - `LiveSession` - Active WebSocket connection for bidirectional
//!   communication: audio chunks and turn-end signals flow up, text, audio,
//!   and turn-complete events flow back as [`LiveEvent`]s.

use futures_util::{SinkExt, StreamExt};
use std::env;
use tokio::net::TcpStream;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};
use tracing::{debug, error, info, instrument, trace, warn};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chalkboard_error::{GeminiError, GeminiErrorKind};

use super::GeminiResult;
use super::live_protocol::*;

/// WebSocket endpoint for the Gemini Live API.
const LIVE_API_ENDPOINT: &str = "wss://generativelanguage.googleapis.com/ws/google.ai.generativelanguage.v1beta.GenerativeService.BidiGenerateContent";

/// MIME type of microphone audio forwarded from the browser.
const CLIENT_AUDIO_MIME: &str = "audio/webm";

/// An event produced by the model during a live session.
#[derive(Debug, Clone, PartialEq)]
pub enum LiveEvent {
    /// Incremental text from the model turn
    Text(String),
    /// Raw audio bytes from the model turn
    Audio(Vec<u8>),
    /// The model finished its turn
    TurnComplete,
    /// The server closed the session
    Closed(String),
}

/// Client for creating Gemini Live API WebSocket sessions.
///
/// This client handles API key management and creates WebSocket connections
/// to the Gemini Live API.
#[derive(Clone)]
pub struct GeminiLiveClient {
    api_key: String,
}

impl GeminiLiveClient {
    /// Create a new Live API client.
    ///
    /// Reads the API key from the `GEMINI_API_KEY` environment variable.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use chalkboard_models::GeminiLiveClient;
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let client = GeminiLiveClient::new()?;
    /// # Ok(())
    /// # }
    /// ```
    #[instrument(name = "gemini_live_client_new")]
    pub fn new() -> GeminiResult<Self> {
        let api_key = env::var("GEMINI_API_KEY")
            .map_err(|_| GeminiError::new(GeminiErrorKind::MissingApiKey))?;

        Ok(Self { api_key })
    }

    /// Connect to the Live API and perform setup handshake.
    ///
    /// Establishes a WebSocket connection, sends the setup message, and waits
    /// for `setupComplete` confirmation before returning the session.
    ///
    /// # Arguments
    ///
    /// * `model` - Model name (e.g., "models/gemini-2.0-flash-live-001")
    #[instrument(name = "gemini_live_client_connect", skip(self))]
    pub async fn connect(&self, model: &str) -> GeminiResult<LiveSession> {
        LiveSession::new(&self.api_key, model).await
    }
}

/// Active WebSocket session with the Gemini Live API.
///
/// Provides methods for streaming audio up and receiving model events back
/// over the WebSocket connection.
pub struct LiveSession {
    ws_stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
    model: String,
    // One server message can carry several events; extras queue here.
    pending: std::collections::VecDeque<LiveEvent>,
}

impl LiveSession {
    /// Create a new Live API session.
    ///
    /// Performs WebSocket connection and setup handshake.
    async fn new(api_key: &str, model: &str) -> GeminiResult<Self> {
        info!("Connecting to Gemini Live API for model: {}", model);

        // Build WebSocket URL with API key
        let url = format!("{}?key={}", LIVE_API_ENDPOINT, api_key);

        // Connect to WebSocket
        let (ws_stream, _) = connect_async(&url).await.map_err(|e| {
            error!("WebSocket connection failed: {}", e);
            GeminiError::new(GeminiErrorKind::WebSocketConnection(e.to_string()))
        })?;

        debug!("WebSocket connection established");

        let mut session = Self {
            ws_stream,
            model: model.to_string(),
            pending: std::collections::VecDeque::new(),
        };

        session.setup_handshake(model).await?;

        info!("Live API session established for model: {}", model);
        Ok(session)
    }

    /// The model this session was opened against.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Perform setup handshake with the server.
    ///
    /// Sends setup message and waits for setupComplete confirmation.
    async fn setup_handshake(&mut self, model: &str) -> GeminiResult<()> {
        debug!("Sending setup message");

        let setup = SetupMessage {
            setup: SetupConfig {
                model: model.to_string(),
                generation_config: Some(GenerationConfig {
                    response_modalities: Some(vec!["AUDIO".to_string(), "TEXT".to_string()]),
                    ..Default::default()
                }),
            },
        };

        let json = serde_json::to_string(&setup).map_err(|e| {
            error!("Failed to serialize setup message: {}", e);
            GeminiError::new(GeminiErrorKind::WebSocketHandshake(format!(
                "Serialization error: {}",
                e
            )))
        })?;

        trace!("Setup message JSON: {}", json);

        self.ws_stream
            .send(Message::Text(json.into()))
            .await
            .map_err(|e| {
                error!("Failed to send setup message: {}", e);
                GeminiError::new(GeminiErrorKind::WebSocketHandshake(format!(
                    "Send error: {}",
                    e
                )))
            })?;

        debug!("Setup message sent, waiting for setupComplete");

        while let Some(msg_result) = self.ws_stream.next().await {
            let msg = msg_result.map_err(|e| {
                error!("Error receiving setup response: {}", e);
                GeminiError::new(GeminiErrorKind::WebSocketHandshake(format!(
                    "Receive error: {}",
                    e
                )))
            })?;

            if let Message::Text(text) = msg {
                trace!("Received message: {}", text);

                let server_msg: ServerMessage = serde_json::from_str(&text).map_err(|e| {
                    error!("Failed to parse server message: {}", e);
                    GeminiError::new(GeminiErrorKind::InvalidServerMessage(format!(
                        "Parse error: {}",
                        e
                    )))
                })?;

                if server_msg.is_setup_complete() {
                    debug!("Received setupComplete");
                    return Ok(());
                } else if server_msg.is_go_away() {
                    let reason = server_msg
                        .go_away
                        .map(|ga| ga.reason)
                        .unwrap_or_else(|| "unknown".to_string());
                    error!("Server sent goAway during setup: {}", reason);
                    return Err(GeminiError::new(GeminiErrorKind::ServerDisconnect(reason)));
                } else {
                    warn!("Unexpected message during setup: {:?}", server_msg);
                }
            }
        }

        error!("WebSocket closed before setupComplete received");
        Err(GeminiError::new(GeminiErrorKind::WebSocketHandshake(
            "Connection closed before setup complete".to_string(),
        )))
    }

    /// Stream a chunk of client audio to the model.
    ///
    /// # Arguments
    ///
    /// * `audio` - Raw audio bytes from the client microphone stream
    #[instrument(name = "live_session_send_audio", skip(self, audio), fields(bytes = audio.len()))]
    pub async fn send_audio_chunk(&mut self, audio: &[u8]) -> GeminiResult<()> {
        let message = RealtimeInputMessage {
            realtime_input: RealtimeInput {
                media_chunks: vec![MediaChunk {
                    mime_type: CLIENT_AUDIO_MIME.to_string(),
                    data: STANDARD.encode(audio),
                }],
            },
        };

        self.send_json(&message).await
    }

    /// Signal that the user finished speaking.
    ///
    /// The model starts its turn once the client turn is marked complete.
    #[instrument(name = "live_session_send_turn_end", skip(self))]
    pub async fn send_turn_end(&mut self) -> GeminiResult<()> {
        let message = ClientContentMessage {
            client_content: ClientContent {
                turns: vec![],
                turn_complete: true,
            },
        };

        self.send_json(&message).await
    }

    /// Receive the next model event.
    ///
    /// Returns `None` when the WebSocket stream ends.
    pub async fn next_event(&mut self) -> GeminiResult<Option<LiveEvent>> {
        if let Some(event) = self.pending.pop_front() {
            return Ok(Some(event));
        }

        while let Some(msg_result) = self.ws_stream.next().await {
            let msg = msg_result.map_err(|e| {
                error!("Error receiving live message: {}", e);
                GeminiError::new(GeminiErrorKind::ApiRequest(e.to_string()))
            })?;

            match msg {
                Message::Text(text) => {
                    trace!("Received live message: {}", text);

                    let server_msg: ServerMessage =
                        serde_json::from_str(&text).map_err(|e| {
                            GeminiError::new(GeminiErrorKind::InvalidServerMessage(format!(
                                "Parse error: {}",
                                e
                            )))
                        })?;

                    if server_msg.is_go_away() {
                        let reason = server_msg
                            .go_away
                            .map(|ga| ga.reason)
                            .unwrap_or_else(|| "unknown".to_string());
                        return Ok(Some(LiveEvent::Closed(reason)));
                    }

                    if let Some(text) = server_msg.extract_text() {
                        self.pending.push_back(LiveEvent::Text(text));
                    }

                    if let Some(inline) = server_msg.extract_inline_data() {
                        let audio = STANDARD.decode(&inline.data).map_err(|e| {
                            GeminiError::new(GeminiErrorKind::Base64Decode(e.to_string()))
                        })?;
                        self.pending.push_back(LiveEvent::Audio(audio));
                    }

                    if server_msg.is_turn_complete() {
                        self.pending.push_back(LiveEvent::TurnComplete);
                    }

                    if let Some(event) = self.pending.pop_front() {
                        return Ok(Some(event));
                    }

                    // Unknown message variant; keep reading
                    continue;
                }
                Message::Close(frame) => {
                    let reason = frame
                        .map(|f| f.reason.to_string())
                        .unwrap_or_else(|| "closed".to_string());
                    return Ok(Some(LiveEvent::Closed(reason)));
                }
                _ => continue,
            }
        }

        Ok(None)
    }

    /// Close the session gracefully.
    pub async fn close(&mut self) -> GeminiResult<()> {
        self.ws_stream
            .close(None)
            .await
            .map_err(|e| GeminiError::new(GeminiErrorKind::ApiRequest(e.to_string())))?;
        Ok(())
    }

    async fn send_json<T: serde::Serialize>(&mut self, message: &T) -> GeminiResult<()> {
        let json = serde_json::to_string(message).map_err(|e| {
            GeminiError::new(GeminiErrorKind::ApiRequest(format!(
                "Serialization error: {}",
                e
            )))
        })?;

        self.ws_stream
            .send(Message::Text(json.into()))
            .await
            .map_err(|e| {
                error!("Failed to send live message: {}", e);
                GeminiError::new(GeminiErrorKind::ApiRequest(format!("Send error: {}", e)))
            })
    }
}
