//! Wire types and calls for the Gemini REST API.
//!
//! The `gemini-rust` SDK covers plain text generation. Structured output,
//! image generation, speech synthesis, and Veo long-running video jobs go
//! through the v1beta REST endpoints directly.

use chalkboard_error::{GeminiError, GeminiErrorKind};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::GeminiResult;

/// Base URL for the generative language REST API.
const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

//
// ─── REQUEST TYPES ──────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub(super) struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<ToolDeclarations>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub(super) struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub(super) struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<InlineData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub function_call: Option<FunctionCall>,
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Default::default()
        }
    }

    pub fn inline(mime_type: impl Into<String>, data_base64: impl Into<String>) -> Self {
        Self {
            inline_data: Some(InlineData {
                mime_type: mime_type.into(),
                data: data_base64.into(),
            }),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct InlineData {
    pub mime_type: String,
    pub data: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(super) struct FunctionCall {
    pub name: String,
    #[serde(default)]
    pub args: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub(super) struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_schema: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_modalities: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ToolDeclarations {
    pub function_declarations: Vec<FunctionDeclaration>,
}

#[derive(Debug, Clone, Serialize)]
pub(super) struct FunctionDeclaration {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

//
// ─── RESPONSE TYPES ─────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Deserialize, Default)]
pub(super) struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

impl GenerateContentResponse {
    /// Iterate the parts of the first candidate.
    pub fn parts(&self) -> impl Iterator<Item = &Part> {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|c| c.parts.iter())
            .into_iter()
            .flatten()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct Candidate {
    pub content: Option<Content>,
    #[allow(dead_code)]
    pub finish_reason: Option<String>,
}

//
// ─── VIDEO JOB TYPES ────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Serialize)]
pub(super) struct PredictLongRunningRequest {
    pub instances: Vec<VideoInstance>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<VideoParameters>,
}

#[derive(Debug, Clone, Serialize)]
pub(super) struct VideoInstance {
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageInstance>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ImageInstance {
    pub bytes_base64_encoded: String,
    pub mime_type: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct VideoParameters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct OperationResponse {
    pub name: String,
    #[serde(default)]
    pub done: bool,
    pub error: Option<OperationError>,
    pub response: Option<OperationResult>,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct OperationError {
    #[allow(dead_code)]
    pub code: Option<i64>,
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct OperationResult {
    pub generate_video_response: Option<GenerateVideoResponse>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct GenerateVideoResponse {
    #[serde(default)]
    pub generated_samples: Vec<GeneratedSample>,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct GeneratedSample {
    pub video: Option<VideoRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct VideoRef {
    pub uri: Option<String>,
}

//
// ─── CLIENT ─────────────────────────────────────────────────────────────────────
//

/// Thin REST client over the generative language endpoints.
#[derive(Clone)]
pub(super) struct RestClient {
    http: reqwest::Client,
    api_key: String,
}

impl RestClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
        }
    }

    /// POST `models/{model}:generateContent`.
    #[instrument(skip(self, request), fields(model))]
    pub async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> GeminiResult<GenerateContentResponse> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            API_BASE, model, self.api_key
        );
        self.post_json(&url, request).await
    }

    /// POST `models/{model}:predictLongRunning`, returning the operation name.
    #[instrument(skip(self, request), fields(model))]
    pub async fn predict_long_running(
        &self,
        model: &str,
        request: &PredictLongRunningRequest,
    ) -> GeminiResult<String> {
        let url = format!(
            "{}/models/{}:predictLongRunning?key={}",
            API_BASE, model, self.api_key
        );
        let operation: OperationResponse = self.post_json(&url, request).await?;
        debug!(operation = %operation.name, "Video job submitted");
        Ok(operation.name)
    }

    /// GET an operation by its provider-assigned name.
    #[instrument(skip(self))]
    pub async fn get_operation(&self, name: &str) -> GeminiResult<OperationResponse> {
        let url = format!("{}/{}?key={}", API_BASE, name, self.api_key);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| GeminiError::new(GeminiErrorKind::ApiRequest(e.to_string())))?;

        Self::check_status(&response)?;
        response
            .json()
            .await
            .map_err(|e| GeminiError::new(GeminiErrorKind::ApiRequest(e.to_string())))
    }

    /// Download generated media from a provider URI (keyed).
    #[instrument(skip(self))]
    pub async fn download(&self, uri: &str) -> GeminiResult<Vec<u8>> {
        let separator = if uri.contains('?') { '&' } else { '?' };
        let url = format!("{}{}key={}", uri, separator, self.api_key);

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| GeminiError::new(GeminiErrorKind::ApiRequest(e.to_string())))?;

        Self::check_status(&response)?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| GeminiError::new(GeminiErrorKind::ApiRequest(e.to_string())))?;
        Ok(bytes.to_vec())
    }

    async fn post_json<B: Serialize, R: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        body: &B,
    ) -> GeminiResult<R> {
        let response = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| GeminiError::new(GeminiErrorKind::ApiRequest(e.to_string())))?;

        Self::check_status(&response)?;
        response
            .json()
            .await
            .map_err(|e| GeminiError::new(GeminiErrorKind::ApiRequest(e.to_string())))
    }

    fn check_status(response: &reqwest::Response) -> GeminiResult<()> {
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        Err(GeminiError::new(GeminiErrorKind::HttpStatus {
            status_code: status.as_u16(),
            message: status
                .canonical_reason()
                .unwrap_or("unknown status")
                .to_string(),
        }))
    }
}
