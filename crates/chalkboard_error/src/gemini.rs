//! Gemini provider error types.

/// Gemini-specific error conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum GeminiErrorKind {
    /// API key not found in environment
    #[display("GEMINI_API_KEY environment variable not set")]
    MissingApiKey,
    /// Failed to create Gemini client
    #[display("Failed to create Gemini client: {}", _0)]
    ClientCreation(String),
    /// API request failed
    #[display("Gemini API request failed: {}", _0)]
    ApiRequest(String),
    /// HTTP error with status code and message
    #[display("HTTP {} error: {}", status_code, message)]
    HttpStatus {
        /// HTTP status code
        status_code: u16,
        /// Error message
        message: String,
    },
    /// Model produced no usable output for the requested modality
    #[display("Model returned no {} output", _0)]
    MissingOutput(String),
    /// A completed long-running operation reported an error
    #[display("Operation '{}' failed: {}", operation, message)]
    OperationFailed {
        /// Provider-assigned operation name
        operation: String,
        /// The error field of the completed job
        message: String,
    },
    /// URL media sources not supported for inline requests
    #[display("URL media sources not supported; supply base64 or raw bytes")]
    UrlMediaNotSupported,
    /// Base64 decoding failed
    #[display("Base64 decode error: {}", _0)]
    Base64Decode(String),
    /// WebSocket connection failed
    #[display("WebSocket connection failed: {}", _0)]
    WebSocketConnection(String),
    /// WebSocket handshake failed (setup phase)
    #[display("WebSocket handshake failed: {}", _0)]
    WebSocketHandshake(String),
    /// Invalid message received from server
    #[display("Invalid server message: {}", _0)]
    InvalidServerMessage(String),
    /// Server closed the connection
    #[display("Server disconnected: {}", _0)]
    ServerDisconnect(String),
}

/// Gemini error with source location tracking.
///
/// # Examples
///
/// ```
/// use chalkboard_error::{GeminiError, GeminiErrorKind};
///
/// let err = GeminiError::new(GeminiErrorKind::MissingApiKey);
/// assert!(format!("{}", err).contains("GEMINI_API_KEY"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Gemini Error: {} at line {} in {}", kind, line, file)]
pub struct GeminiError {
    /// The kind of error that occurred
    pub kind: GeminiErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl GeminiError {
    /// Create a new GeminiError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: GeminiErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
