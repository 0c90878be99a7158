//! Top-level error wrapper types.

use crate::{
    BuilderError, ConfigError, FlowError, GeminiError, HttpError, JsonError, LiveError,
    RateLimitError, RosterError, SchemaError,
};

/// Foundation error enum aggregating every Chalkboard error domain.
///
/// # Examples
///
/// ```
/// use chalkboard_error::{ChalkboardError, HttpError};
///
/// let http_err = HttpError::new("Connection failed");
/// let err: ChalkboardError = http_err.into();
/// assert!(format!("{}", err).contains("HTTP Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum ChalkboardErrorKind {
    /// HTTP error
    #[from(HttpError)]
    Http(HttpError),
    /// JSON serialization/deserialization error
    #[from(JsonError)]
    Json(JsonError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Builder error
    #[from(BuilderError)]
    Builder(BuilderError),
    /// Caller input validation error
    #[from(SchemaError)]
    Schema(SchemaError),
    /// Gemini provider error
    #[from(GeminiError)]
    Gemini(GeminiError),
    /// Flow execution error
    #[from(FlowError)]
    Flow(FlowError),
    /// Realtime bridge error
    #[from(LiveError)]
    Live(LiveError),
    /// Student roster error
    #[from(RosterError)]
    Roster(RosterError),
    /// Rate limiting error
    #[from(RateLimitError)]
    RateLimit(RateLimitError),
}

/// Chalkboard error with kind discrimination.
///
/// # Examples
///
/// ```
/// use chalkboard_error::{ChalkboardResult, ConfigError};
///
/// fn might_fail() -> ChalkboardResult<()> {
///     Err(ConfigError::new("Missing field"))?
/// }
///
/// match might_fail() {
///     Ok(_) => println!("Success"),
///     Err(e) => println!("Error: {}", e),
/// }
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Chalkboard Error: {}", _0)]
pub struct ChalkboardError(Box<ChalkboardErrorKind>);

impl ChalkboardError {
    /// Create a new error from a kind.
    pub fn new(kind: ChalkboardErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &ChalkboardErrorKind {
        &self.0
    }
}

// Generic From implementation for any type that converts to ChalkboardErrorKind
impl<T> From<T> for ChalkboardError
where
    T: Into<ChalkboardErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Chalkboard operations.
///
/// # Examples
///
/// ```
/// use chalkboard_error::{ChalkboardResult, HttpError};
///
/// fn fetch_data() -> ChalkboardResult<String> {
///     Err(HttpError::new("404 Not Found"))?
/// }
/// ```
pub type ChalkboardResult<T> = std::result::Result<T, ChalkboardError>;
