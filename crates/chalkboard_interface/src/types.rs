//! Core type definitions for the Chalkboard interface.

use serde::{Deserialize, Serialize};

/// Definition of a tool/function that the model can call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Name of the tool/function
    pub name: String,
    /// Human-readable description of what the tool does
    pub description: String,
    /// JSON Schema defining the parameters this tool accepts
    pub parameters: serde_json::Value,
}

/// Binary image data with its MIME type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageData {
    /// MIME type, e.g., "image/png"
    pub mime: String,
    /// Raw image bytes
    pub data: Vec<u8>,
}

/// Parameters for a long-running video generation job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoJobRequest {
    /// Text prompt describing the video
    pub prompt: String,
    /// Optional reference image attached to the prompt
    pub reference_image: Option<ImageData>,
    /// Requested clip duration in seconds, if the model supports it
    pub duration_seconds: Option<u32>,
    /// Requested aspect ratio (e.g., "16:9"), if the model supports it
    pub aspect_ratio: Option<String>,
    /// Video model override; the backend default is used when `None`
    pub model: Option<String>,
}

/// Opaque handle for an in-flight long-running operation.
///
/// The provider assigns the operation name at submission; callers poll it
/// through [`crate::VideoGeneration::check_operation`] until the status
/// reports completion or an error.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OperationHandle {
    /// Provider-assigned operation name
    pub name: String,
}

/// Status of a long-running operation.
///
/// A job is finished exactly when `done` is true; `error` is populated if
/// the job completed unsuccessfully.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct OperationStatus {
    /// Completion flag
    pub done: bool,
    /// Error reported by the completed job, if any
    pub error: Option<String>,
    /// The produced video, populated on successful completion
    pub video: Option<MediaPayload>,
}

/// Binary media payload returned by a completed operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaPayload {
    /// MIME type, e.g., "video/mp4"
    pub mime: String,
    /// Raw media bytes
    pub data: Vec<u8>,
}
