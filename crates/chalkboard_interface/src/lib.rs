//! Trait definitions for model backends and their capabilities.
//!
//! The [`Driver`] trait provides the minimal interface for text generation.
//! Media and structured-output capabilities are exposed through optional
//! traits so flows can state exactly what they need from a backend.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod traits;
mod types;

pub use traits::{Driver, ImageGeneration, JsonMode, SpeechSynthesis, ToolUse, VideoGeneration};
pub use types::{
    ImageData, MediaPayload, OperationHandle, OperationStatus, ToolDefinition, VideoJobRequest,
};
