//! Flow execution error types.

/// Specific error conditions for flow execution.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum FlowErrorKind {
    /// The model did not return output matching the expected schema
    #[display("Missing structured output for {}: {}", stage, message)]
    MissingStructuredOutput {
        /// Which stage expected structured output
        stage: &'static str,
        /// Detail on what was missing or malformed
        message: String,
    },
    /// A required stage failed, aborting the whole flow
    #[display("Stage '{}' failed: {}", stage, message)]
    StageFailed {
        /// The failing stage
        stage: &'static str,
        /// Underlying failure description
        message: String,
    },
    /// A required per-scene stage failed, aborting the whole flow
    #[display("Stage '{}' failed for scene {}: {}", stage, scene, message)]
    SceneFailed {
        /// The failing stage
        stage: &'static str,
        /// One-based scene number
        scene: usize,
        /// Underlying failure description
        message: String,
    },
    /// A long-running operation exceeded its polling bound
    #[display("Polling timed out after {} checks over {}s", attempts, elapsed_secs)]
    PollTimeout {
        /// Number of status checks issued
        attempts: usize,
        /// Seconds elapsed before giving up
        elapsed_secs: u64,
    },
    /// A tool handler failed inside an assistant turn
    #[display("Tool '{}' failed: {}", tool, message)]
    ToolFailed {
        /// The tool name
        tool: String,
        /// Underlying failure description
        message: String,
    },
    /// The model requested a tool that is not registered
    #[display("Unknown tool requested: {}", _0)]
    UnknownTool(String),
}

/// Flow error with source location tracking.
///
/// # Examples
///
/// ```
/// use chalkboard_error::{FlowError, FlowErrorKind};
///
/// let err = FlowError::new(FlowErrorKind::SceneFailed {
///     stage: "video",
///     scene: 3,
///     message: "quota exceeded".to_string(),
/// });
/// assert!(format!("{}", err).contains("scene 3"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Flow Error: {} at line {} in {}", kind, line, file)]
pub struct FlowError {
    /// The specific error condition
    pub kind: FlowErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl FlowError {
    /// Create a new FlowError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: FlowErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
