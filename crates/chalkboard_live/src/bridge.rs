//! The bridge accept loop and per-connection pump.

use crate::protocol::{ClientEvent, ServerEvent};
use crate::registry::{SessionInfo, SessionRegistry};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chalkboard_error::{ChalkboardResult, LiveError, LiveErrorKind};
use chalkboard_models::{GeminiLiveClient, LiveEvent, LiveSession};
use chalkboard_rate_limit::ChalkboardConfig;
use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::{WebSocketStream, accept_async, tungstenite::Message};
use tracing::{info, instrument, warn};
use uuid::Uuid;

/// Default upstream model when configuration does not name one.
const DEFAULT_LIVE_MODEL: &str = "models/gemini-2.0-flash-live-001";

/// Accepts browser WebSocket connections and bridges each to its own
/// Gemini Live session.
#[derive(Clone)]
pub struct LiveBridge {
    live_client: GeminiLiveClient,
    registry: SessionRegistry,
    model: String,
}

impl LiveBridge {
    /// Create a bridge that opens upstream sessions against `model`.
    pub fn new(live_client: GeminiLiveClient, model: impl Into<String>) -> Self {
        Self {
            live_client,
            registry: SessionRegistry::new(),
            model: model.into(),
        }
    }

    /// Create a bridge from the loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns an error when the API key is absent; the live feature is
    /// disabled explicitly rather than failing on first use.
    pub fn from_config(config: &ChalkboardConfig) -> ChalkboardResult<Self> {
        let model = config
            .live
            .as_ref()
            .and_then(|live| live.model.clone())
            .unwrap_or_else(|| DEFAULT_LIVE_MODEL.to_string());

        let live_client = GeminiLiveClient::new()?;
        Ok(Self::new(live_client, model))
    }

    /// The registry of active sessions.
    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    /// Bind the listener and serve connections until the listener fails.
    #[instrument(skip(self))]
    pub async fn run(&self, bind: &str) -> ChalkboardResult<()> {
        let listener = TcpListener::bind(bind)
            .await
            .map_err(|e| LiveError::new(LiveErrorKind::Listener(e.to_string())))?;

        info!(bind, model = %self.model, "Live bridge listening");

        loop {
            let (stream, peer) = listener
                .accept()
                .await
                .map_err(|e| LiveError::new(LiveErrorKind::Listener(e.to_string())))?;

            let bridge = self.clone();
            tokio::spawn(async move {
                if let Err(e) = bridge.handle_connection(stream, peer.to_string()).await {
                    warn!(peer = %peer, error = %e, "Bridge connection ended with error");
                }
            });
        }
    }

    /// Serve one client connection.
    async fn handle_connection(&self, stream: TcpStream, peer: String) -> ChalkboardResult<()> {
        let mut ws = accept_async(stream)
            .await
            .map_err(|e| LiveError::new(LiveErrorKind::ClientHandshake(e.to_string())))?;

        // Open the upstream session before registering; a client that
        // cannot be bridged gets an explicit error and a close.
        let upstream = match self.live_client.connect(&self.model).await {
            Ok(session) => session,
            Err(e) => {
                warn!(peer = %peer, error = %e, "Failed to open upstream live session");
                let _ = send_event(
                    &mut ws,
                    &ServerEvent::Error {
                        message: "Live session unavailable.".to_string(),
                    },
                )
                .await;
                let _ = ws.close(None).await;
                return Err(LiveError::new(LiveErrorKind::Upstream(e.to_string())).into());
            }
        };

        let session_id = self.registry.register(SessionInfo {
            peer: peer.clone(),
            model: self.model.clone(),
        });

        let result = pump(&mut ws, upstream, &session_id).await;

        self.registry.remove(&session_id);
        let _ = ws.close(None).await;
        result
    }
}

/// Forward frames in both directions until either side closes.
async fn pump(
    ws: &mut WebSocketStream<TcpStream>,
    mut upstream: LiveSession,
    session_id: &Uuid,
) -> ChalkboardResult<()> {
    loop {
        tokio::select! {
            client_msg = ws.next() => {
                match client_msg {
                    Some(Ok(Message::Binary(audio))) => {
                        upstream
                            .send_audio_chunk(&audio)
                            .await
                            .map_err(|e| LiveError::new(LiveErrorKind::Forward(e.to_string())))?;
                    }
                    Some(Ok(Message::Text(text))) => {
                        match serde_json::from_str::<ClientEvent>(&text) {
                            Ok(ClientEvent::UserTurnEnd) => {
                                upstream.send_turn_end().await.map_err(|e| {
                                    LiveError::new(LiveErrorKind::Forward(e.to_string()))
                                })?;
                            }
                            Err(e) => {
                                warn!(session = %session_id, error = %e, "Ignoring invalid client message");
                            }
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        info!(session = %session_id, "Client closed connection");
                        let _ = upstream.close().await;
                        return Ok(());
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        let _ = upstream.close().await;
                        return Err(
                            LiveError::new(LiveErrorKind::Forward(e.to_string())).into()
                        );
                    }
                }
            }
            upstream_event = upstream.next_event() => {
                match upstream_event {
                    Ok(Some(LiveEvent::Text(text))) => {
                        send_event(ws, &ServerEvent::BotText { text }).await?;
                    }
                    Ok(Some(LiveEvent::Audio(audio))) => {
                        send_event(
                            ws,
                            &ServerEvent::BotAudio {
                                audio: STANDARD.encode(&audio),
                            },
                        )
                        .await?;
                    }
                    Ok(Some(LiveEvent::TurnComplete)) => {
                        send_event(ws, &ServerEvent::TurnComplete).await?;
                    }
                    Ok(Some(LiveEvent::Closed(reason))) => {
                        info!(session = %session_id, reason = %reason, "Upstream session closed");
                        return Ok(());
                    }
                    Ok(None) => {
                        info!(session = %session_id, "Upstream stream ended");
                        return Ok(());
                    }
                    Err(e) => {
                        warn!(session = %session_id, error = %e, "Upstream error");
                        let _ = send_event(
                            ws,
                            &ServerEvent::Error {
                                message: "Live API error.".to_string(),
                            },
                        )
                        .await;
                        return Err(e.into());
                    }
                }
            }
        }
    }
}

async fn send_event(
    ws: &mut WebSocketStream<TcpStream>,
    event: &ServerEvent,
) -> ChalkboardResult<()> {
    let json = serde_json::to_string(event)
        .map_err(|e| LiveError::new(LiveErrorKind::Forward(e.to_string())))?;

    ws.send(Message::Text(json.into()))
        .await
        .map_err(|e| LiveError::new(LiveErrorKind::Forward(e.to_string())))?;
    Ok(())
}
