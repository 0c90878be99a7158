//! Student roster error types.

/// Specific error conditions for roster storage.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum RosterErrorKind {
    /// Student id not present in the store
    #[display("Student not found: {}", _0)]
    StudentNotFound(String),
    /// Failed to create a storage directory
    #[display("Failed to create directory: {}", _0)]
    DirectoryCreation(String),
    /// Failed to read a document
    #[display("Failed to read document: {}", _0)]
    DocumentRead(String),
    /// Failed to write a document
    #[display("Failed to write document: {}", _0)]
    DocumentWrite(String),
    /// Document contents did not deserialize
    #[display("Malformed document: {}", _0)]
    MalformedDocument(String),
    /// Unrecognized backend name in configuration
    #[display("Unknown roster backend: {}", _0)]
    UnknownBackend(String),
}

/// Roster error with source location tracking.
///
/// # Examples
///
/// ```
/// use chalkboard_error::{RosterError, RosterErrorKind};
///
/// let err = RosterError::new(RosterErrorKind::StudentNotFound("s-9".to_string()));
/// assert!(format!("{}", err).contains("s-9"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Roster Error: {} at line {} in {}", kind, line, file)]
pub struct RosterError {
    /// The specific error condition
    pub kind: RosterErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl RosterError {
    /// Create a new RosterError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: RosterErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
