//! Realtime bridge error types.

/// Specific error conditions for the live audio bridge.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum LiveErrorKind {
    /// Failed to bind or accept on the bridge listener
    #[display("Bridge listener error: {}", _0)]
    Listener(String),
    /// Client WebSocket handshake failed
    #[display("Client handshake failed: {}", _0)]
    ClientHandshake(String),
    /// Failed to open the upstream model session
    #[display("Upstream session error: {}", _0)]
    Upstream(String),
    /// Malformed control message from the client
    #[display("Invalid client message: {}", _0)]
    InvalidClientMessage(String),
    /// Session not present in the registry
    #[display("Unknown session: {}", _0)]
    UnknownSession(String),
    /// Failed to forward a frame to the peer
    #[display("Forwarding failed: {}", _0)]
    Forward(String),
}

/// Live bridge error with source location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Live Error: {} at line {} in {}", kind, line, file)]
pub struct LiveError {
    /// The specific error condition
    pub kind: LiveErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl LiveError {
    /// Create a new LiveError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: LiveErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
