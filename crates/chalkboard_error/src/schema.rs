//! Request validation error types.
//!
//! These errors are raised when caller-supplied flow input fails schema
//! validation. They surface before any remote call is made.

/// Specific validation error conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum SchemaErrorKind {
    /// String field shorter than the declared minimum
    #[display("Field '{}' must be at least {} characters", field, min)]
    TooShort {
        /// The field name
        field: &'static str,
        /// Minimum length
        min: usize,
    },
    /// Numeric field outside the declared range
    #[display("Field '{}' must be between {} and {}, got {}", field, min, max, value)]
    OutOfRange {
        /// The field name
        field: &'static str,
        /// Inclusive minimum
        min: i64,
        /// Inclusive maximum
        max: i64,
        /// The offending value
        value: i64,
    },
    /// Value not among the enumerated choices
    #[display("Field '{}' has unsupported value '{}'", field, value)]
    InvalidChoice {
        /// The field name
        field: &'static str,
        /// The offending value
        value: String,
    },
    /// Malformed data URI in a media field
    #[display("Field '{}' is not a valid data URI: {}", field, reason)]
    InvalidDataUri {
        /// The field name
        field: &'static str,
        /// Why the URI was rejected
        reason: String,
    },
}

/// Validation error with source location tracking.
///
/// # Examples
///
/// ```
/// use chalkboard_error::{SchemaError, SchemaErrorKind};
///
/// let err = SchemaError::new(SchemaErrorKind::TooShort { field: "story", min: 20 });
/// assert!(format!("{}", err).contains("at least 20"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Validation Error: {} at line {} in {}", kind, line, file)]
pub struct SchemaError {
    /// The specific error condition
    pub kind: SchemaErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl SchemaError {
    /// Create a new SchemaError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: SchemaErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
