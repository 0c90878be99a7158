//! Rate limiting error types.

/// Specific error conditions for rate limiting.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum RateLimitErrorKind {
    /// A quota value in configuration was invalid
    #[display("Invalid quota for {}: {}", field, reason)]
    InvalidQuota {
        /// Which quota field
        field: &'static str,
        /// Why it was rejected
        reason: String,
    },
    /// Requested tier name not present in configuration
    #[display("Unknown tier: {}", _0)]
    UnknownTier(String),
}

/// Rate limit error with source location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Rate Limit Error: {} at line {} in {}", kind, line, file)]
pub struct RateLimitError {
    /// The specific error condition
    pub kind: RateLimitErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl RateLimitError {
    /// Create a new RateLimitError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: RateLimitErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
