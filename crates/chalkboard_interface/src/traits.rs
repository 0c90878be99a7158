//! Trait definitions for model backends and their capabilities.

use crate::{OperationHandle, OperationStatus, ToolDefinition, VideoJobRequest};
use async_trait::async_trait;
use chalkboard_core::{GenerateRequest, GenerateResponse, Output};
use chalkboard_error::ChalkboardResult;

/// Core trait that all model backends must implement.
///
/// This provides the minimal interface for text generation. Additional
/// capabilities are exposed through optional traits.
#[async_trait]
pub trait Driver: Send + Sync {
    /// Generate model output given a multimodal request.
    async fn generate(&self, req: &GenerateRequest) -> ChalkboardResult<GenerateResponse>;

    /// Provider name (e.g., "gemini").
    fn provider_name(&self) -> &'static str;

    /// Default model identifier (e.g., "gemini-2.0-flash").
    fn model_name(&self) -> &str;
}

/// Trait for models that support structured JSON output.
///
/// Flows use this for every call whose result must match a declared schema.
/// A response that cannot be coerced to the schema is a terminal
/// missing-structured-output failure; no retry is attempted.
#[async_trait]
pub trait JsonMode: Driver {
    /// Generate output conforming to a JSON schema.
    async fn generate_json(
        &self,
        req: &GenerateRequest,
        schema: &serde_json::Value,
    ) -> ChalkboardResult<serde_json::Value>;
}

/// Trait for models that support function/tool calling.
#[async_trait]
pub trait ToolUse: Driver {
    /// Generate with available tools/functions.
    ///
    /// The response may contain tool calls (in `Output::ToolCalls`) instead of
    /// or in addition to text output. Your application should execute these
    /// tools and send results back in a follow-up request.
    async fn generate_with_tools(
        &self,
        req: &GenerateRequest,
        tools: &[ToolDefinition],
    ) -> ChalkboardResult<GenerateResponse>;

    /// Maximum number of tools that can be provided.
    fn max_tools(&self) -> usize {
        128
    }
}

/// Trait for models that can generate images.
#[async_trait]
pub trait ImageGeneration: Driver {
    /// Generate a single image from a prompt.
    ///
    /// Returns `Output::Image` with the image bytes and MIME type.
    async fn generate_image(&self, prompt: &str) -> ChalkboardResult<Output>;
}

/// Trait for models that can synthesize speech from text.
#[async_trait]
pub trait SpeechSynthesis: Driver {
    /// Synthesize narration audio for the given text.
    ///
    /// Returns `Output::Audio` carrying raw PCM samples; callers wrap them
    /// in a playable container.
    async fn synthesize(&self, text: &str) -> ChalkboardResult<Output>;

    /// Sample rate of the returned PCM audio.
    fn sample_rate_hz(&self) -> u32 {
        24_000
    }
}

/// Trait for models that generate video through long-running operations.
///
/// Submission returns an opaque [`OperationHandle`] rather than a result;
/// callers poll [`check_operation`](VideoGeneration::check_operation) until
/// the status reports completion or an error.
#[async_trait]
pub trait VideoGeneration: Driver {
    /// Submit a video generation job.
    async fn start_video(&self, job: &VideoJobRequest) -> ChalkboardResult<OperationHandle>;

    /// Re-fetch the status of an in-flight operation.
    ///
    /// On successful completion the returned status carries the downloaded
    /// video bytes.
    async fn check_operation(&self, handle: &OperationHandle)
    -> ChalkboardResult<OperationStatus>;
}
