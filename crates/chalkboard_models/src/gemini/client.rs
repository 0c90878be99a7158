//! Google Gemini API client.
//!
//! This module provides a client for the Gemini API with support for:
//! - Per-request model selection (different requests can use different models)
//! - Client pooling with lazy initialization (one client per model)
//! - Per-model rate limiting (each model has independent rate limits)
//! - Thread-safe concurrent access
//!
//! # Architecture
//!
//! The [`GeminiClient`] maintains a pool of model-specific clients, each
//! wrapped in its own rate limiter. When a request specifies a model (via
//! `GenerateRequest.model`), the client either retrieves the existing client
//! for that model or creates a new one on-demand.
//!
//! Plain text requests go through the `gemini-rust` SDK. Structured output,
//! tool calling, image generation, speech synthesis, and Veo video jobs go
//! through the REST endpoints in [`super::rest`].

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::collections::HashMap;
use std::env;
use std::sync::{Arc, Mutex};
use tracing::{instrument, warn};

use gemini_rust::{Gemini, client::Model};

use chalkboard_core::{GenerateRequest, GenerateResponse, Input, Output, Role, ToolCall};
use chalkboard_error::{ChalkboardResult, GeminiError, GeminiErrorKind};
use chalkboard_interface::{
    Driver, ImageGeneration, JsonMode, MediaPayload, OperationHandle, OperationStatus,
    SpeechSynthesis, ToolDefinition, ToolUse, VideoGeneration, VideoJobRequest,
};
use chalkboard_rate_limit::{ChalkboardConfig, RateLimiter, Tier, TierConfig};

use super::rest::{
    FunctionDeclaration, GenerateContentRequest, GenerationConfig, ImageInstance, Part,
    PredictLongRunningRequest, RestClient, ToolDeclarations, VideoInstance, VideoParameters,
};
use super::{GeminiResult, extract_json};

/// Default model for plain generation requests.
const DEFAULT_MODEL: &str = "gemini-2.0-flash";
/// The only model able to generate images.
const IMAGE_MODEL: &str = "gemini-2.0-flash-preview-image-generation";
/// Text-to-speech preview model.
const TTS_MODEL: &str = "gemini-2.5-flash-preview-tts";
/// Default video generation model.
const VIDEO_MODEL: &str = "veo-2.0-generate-001";

//
// ─── TIERED GEMINI ──────────────────────────────────────────────────────────────
//

/// Couples a Gemini API client with its rate limiting tier.
///
/// This type wraps a `Gemini` client and a tier together, enabling the
/// `RateLimiter` to own both the client and its rate limit configuration.
/// This ensures that clients cannot be accessed without going through rate
/// limiting.
#[derive(Clone)]
pub(super) struct TieredGemini<T: Tier> {
    /// The Gemini API client
    pub client: Gemini,
    /// The tier configuration for rate limiting
    pub tier: T,
}

impl<T: Tier> Tier for TieredGemini<T> {
    fn rpm(&self) -> Option<u32> {
        self.tier.rpm()
    }

    fn tpm(&self) -> Option<u64> {
        self.tier.tpm()
    }

    fn rpd(&self) -> Option<u32> {
        self.tier.rpd()
    }

    fn max_concurrent(&self) -> Option<u32> {
        self.tier.max_concurrent()
    }

    fn name(&self) -> &str {
        self.tier.name()
    }
}

//
// ─── CLIENT ─────────────────────────────────────────────────────────────────────
//

/// Client for the Google Gemini API with per-model client pooling.
///
/// This client maintains a cache of model-specific Gemini clients, each with
/// its own rate limiter. Clients are created lazily on first use for each
/// model.
pub struct GeminiClient {
    /// Cache of model-specific clients with rate limiting
    clients: Arc<Mutex<HashMap<String, RateLimiter<TieredGemini<TierConfig>>>>>,
    /// REST client for endpoints the SDK does not cover
    rest: RestClient,
    /// API key for creating new clients
    api_key: String,
    /// Default model name when req.model is None
    model_name: String,
    /// Base tier configuration (tier-level defaults + model-specific overrides)
    base_tier: TierConfig,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let client_count = self.clients.lock().unwrap().len();
        f.debug_struct("GeminiClient")
            .field("model_name", &self.model_name)
            .field("base_tier", &self.base_tier.name())
            .field("cached_clients", &client_count)
            .finish_non_exhaustive()
    }
}

impl GeminiClient {
    /// Convert a model name string to a gemini-rust Model enum variant.
    ///
    /// Maps common model name strings to their corresponding Model enum
    /// variants. Uses Model::Custom for unrecognized model names,
    /// automatically adding the "models/" prefix required by the API.
    fn model_name_to_enum(name: &str) -> Model {
        match name {
            "gemini-2.5-flash" => Model::Gemini25Flash,
            "gemini-2.5-flash-lite" => Model::Gemini25FlashLite,
            "gemini-2.5-pro" => Model::Gemini25Pro,
            other => {
                if other.starts_with("models/") {
                    Model::Custom(other.to_string())
                } else {
                    Model::Custom(format!("models/{}", other))
                }
            }
        }
    }

    /// Whether generation features are available in this environment.
    ///
    /// Callers gate their generation surfaces on this instead of failing
    /// deep inside a flow when the key is absent.
    pub fn available() -> bool {
        env::var("GEMINI_API_KEY").is_ok()
    }

    /// Create a new Gemini client with the default (free) tier limits.
    ///
    /// Reads the API key from the `GEMINI_API_KEY` environment variable.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use chalkboard_models::GeminiClient;
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let client = GeminiClient::new()?;
    /// # Ok(())
    /// # }
    /// ```
    #[instrument(name = "gemini_client_new")]
    pub fn new() -> ChalkboardResult<Self> {
        Self::new_internal(None).map_err(Into::into)
    }

    /// Create a new Gemini client with rate limiting from configuration.
    ///
    /// Loads tier configuration from chalkboard.toml, including
    /// model-specific rate limit overrides.
    ///
    /// # Arguments
    ///
    /// * `tier_name` - Optional tier name (uses provider default if None)
    ///
    /// # Example
    ///
    /// ```no_run
    /// use chalkboard_models::GeminiClient;
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// // Use default tier from config (includes model-specific limits)
    /// let client = GeminiClient::new_with_config(None)?;
    ///
    /// // Use specific tier
    /// let client = GeminiClient::new_with_config(Some("payasyougo"))?;
    /// # Ok(())
    /// # }
    /// ```
    #[instrument(name = "gemini_client_new_with_config")]
    pub fn new_with_config(tier_name: Option<&str>) -> ChalkboardResult<Self> {
        let tier_config = ChalkboardConfig::load()
            .ok()
            .and_then(|config| config.get_tier("gemini", tier_name));

        Self::new_internal(tier_config).map_err(Into::into)
    }

    /// Internal constructor that returns Gemini-specific errors.
    fn new_internal(tier_config: Option<TierConfig>) -> GeminiResult<Self> {
        let api_key = env::var("GEMINI_API_KEY")
            .map_err(|_| GeminiError::new(GeminiErrorKind::MissingApiKey))?;

        let base_tier = tier_config.unwrap_or_else(|| TierConfig {
            name: "Free".to_string(),
            rpm: Some(10),
            tpm: Some(250_000),
            rpd: Some(250),
            max_concurrent: Some(1),
            models: HashMap::new(),
        });

        Ok(Self {
            clients: Arc::new(Mutex::new(HashMap::new())),
            rest: RestClient::new(&api_key),
            api_key,
            model_name: DEFAULT_MODEL.to_string(),
            base_tier,
        })
    }

    /// Get or create the rate-limited client for a model.
    fn limiter_for(&self, model_name: &str) -> RateLimiter<TieredGemini<TierConfig>> {
        let mut clients = self.clients.lock().unwrap();
        clients
            .entry(model_name.to_string())
            .or_insert_with(|| {
                let model_enum = Self::model_name_to_enum(model_name);

                let client = Gemini::with_model(&self.api_key, model_enum)
                    .expect("Failed to create Gemini client for model");

                // Apply model-specific overrides if they exist in the config
                let model_tier = self.base_tier.for_model(model_name);

                RateLimiter::new(TieredGemini {
                    client,
                    tier: model_tier,
                })
            })
            .clone()
    }

    /// Extract text content from an input
    fn extract_text(input: &Input) -> Option<String> {
        match input {
            Input::Text(text) => Some(text.clone()),
            _ => None,
        }
    }

    /// Check if input contains non-text media
    fn has_media(inputs: &[Input]) -> bool {
        inputs.iter().any(|i| !matches!(i, Input::Text(_)))
    }

    /// Estimate token count from text (rough approximation: chars / 4).
    ///
    /// This is a conservative estimate. Actual token count may be lower.
    fn estimate_tokens(text: &str) -> u64 {
        (text.len() / 4).max(1) as u64
    }

    /// Estimate tokens for a whole request, including the output budget.
    fn request_token_estimate(req: &GenerateRequest) -> u64 {
        let input_estimate: u64 = req
            .messages
            .iter()
            .flat_map(|msg| &msg.content)
            .filter_map(Self::extract_text)
            .map(|text| Self::estimate_tokens(&text))
            .sum();
        input_estimate + req.max_tokens.unwrap_or(1000) as u64
    }

    /// Convert request messages to REST contents plus a system instruction.
    fn to_rest_contents(
        req: &GenerateRequest,
    ) -> GeminiResult<(Vec<super::rest::Content>, Option<super::rest::Content>)> {
        let mut contents = Vec::new();
        let mut system_instruction = None;

        for msg in &req.messages {
            match msg.role {
                Role::System => {
                    if let Some(text) = msg.content.iter().find_map(Self::extract_text) {
                        system_instruction = Some(super::rest::Content {
                            role: None,
                            parts: vec![Part::text(text)],
                        });
                    }
                }
                Role::User | Role::Assistant => {
                    let role = match msg.role {
                        Role::User => "user",
                        _ => "model",
                    };
                    let mut parts = Vec::new();
                    for input in &msg.content {
                        parts.push(Self::to_rest_part(input)?);
                    }
                    contents.push(super::rest::Content {
                        role: Some(role.to_string()),
                        parts,
                    });
                }
            }
        }

        Ok((contents, system_instruction))
    }

    fn to_rest_part(input: &Input) -> GeminiResult<Part> {
        use chalkboard_core::MediaSource;

        let (mime, source, default_mime) = match input {
            Input::Text(text) => return Ok(Part::text(text.clone())),
            Input::Image { mime, source } => (mime, source, "image/png"),
            Input::Audio { mime, source } => (mime, source, "audio/wav"),
            Input::Video { mime, source } => (mime, source, "video/mp4"),
        };

        let mime = mime.clone().unwrap_or_else(|| default_mime.to_string());
        let data = match source {
            MediaSource::Base64(encoded) => encoded.clone(),
            MediaSource::Binary(bytes) => STANDARD.encode(bytes),
            MediaSource::Url(_) => {
                return Err(GeminiError::new(GeminiErrorKind::UrlMediaNotSupported));
            }
        };

        Ok(Part::inline(mime, data))
    }

    /// Collect all text parts of a REST response, joined with newlines.
    fn response_text(response: &super::rest::GenerateContentResponse) -> Option<String> {
        let texts: Vec<&str> = response
            .parts()
            .filter_map(|p| p.text.as_deref())
            .collect();
        if texts.is_empty() {
            None
        } else {
            Some(texts.join("\n"))
        }
    }

    /// Find and decode the first inline media part of a REST response.
    fn response_inline_media(
        response: &super::rest::GenerateContentResponse,
    ) -> GeminiResult<Option<(String, Vec<u8>)>> {
        for part in response.parts() {
            if let Some(inline) = &part.inline_data {
                let data = STANDARD
                    .decode(&inline.data)
                    .map_err(|e| GeminiError::new(GeminiErrorKind::Base64Decode(e.to_string())))?;
                return Ok(Some((inline.mime_type.clone(), data)));
            }
        }
        Ok(None)
    }

    /// Internal generate method that returns Gemini-specific errors.
    async fn generate_internal(&self, req: &GenerateRequest) -> GeminiResult<GenerateResponse> {
        let model_name = req.model.clone().unwrap_or_else(|| self.model_name.clone());

        // Multimodal prompts go through the REST path; the SDK builder is
        // text-only.
        if req.messages.iter().any(|m| Self::has_media(&m.content)) {
            return self.generate_multimodal(req, &model_name).await;
        }

        let rate_limited_client = self.limiter_for(&model_name);
        let _guard = rate_limited_client
            .acquire(Self::request_token_estimate(req))
            .await;

        let client = &rate_limited_client.inner().client;
        let mut builder = client.generate_content();
        let mut system_prompt = None;

        for msg in &req.messages {
            match msg.role {
                Role::System => {
                    if let Some(text) = msg.content.iter().find_map(Self::extract_text) {
                        system_prompt = Some(text);
                    }
                }
                Role::User => {
                    for input in &msg.content {
                        if let Some(text) = Self::extract_text(input) {
                            builder = builder.with_user_message(&text);
                        }
                    }
                }
                Role::Assistant => {
                    if let Some(text) = msg.content.iter().find_map(Self::extract_text) {
                        builder = builder.with_model_message(&text);
                    }
                }
            }
        }

        if let Some(prompt) = system_prompt {
            builder = builder.with_system_prompt(&prompt);
        }

        if let Some(temp) = req.temperature {
            builder = builder.with_temperature(temp);
        }

        if let Some(max_tokens) = req.max_tokens {
            builder = builder.with_max_output_tokens(max_tokens as i32);
        }

        let response = builder
            .execute()
            .await
            .map_err(|e| GeminiError::new(GeminiErrorKind::ApiRequest(e.to_string())))?;

        Ok(GenerateResponse {
            outputs: vec![Output::Text(response.text())],
        })
    }

    /// Generate with media inputs via the REST endpoint.
    async fn generate_multimodal(
        &self,
        req: &GenerateRequest,
        model_name: &str,
    ) -> GeminiResult<GenerateResponse> {
        let (contents, system_instruction) = Self::to_rest_contents(req)?;
        let request = GenerateContentRequest {
            contents,
            system_instruction,
            generation_config: Some(GenerationConfig {
                temperature: req.temperature,
                max_output_tokens: req.max_tokens.map(|t| t as i32),
                ..Default::default()
            }),
            tools: None,
        };

        let limiter = self.limiter_for(model_name);
        let _guard = limiter.acquire(Self::request_token_estimate(req)).await;

        let response = self.rest.generate_content(model_name, &request).await?;
        let text = Self::response_text(&response)
            .ok_or_else(|| GeminiError::new(GeminiErrorKind::MissingOutput("text".to_string())))?;

        Ok(GenerateResponse {
            outputs: vec![Output::Text(text)],
        })
    }
}

#[async_trait]
impl Driver for GeminiClient {
    async fn generate(&self, req: &GenerateRequest) -> ChalkboardResult<GenerateResponse> {
        self.generate_internal(req).await.map_err(Into::into)
    }

    fn provider_name(&self) -> &'static str {
        "gemini"
    }

    /// Returns the default model name used when `GenerateRequest.model` is
    /// None. Individual requests may use different models by specifying
    /// `GenerateRequest.model`.
    fn model_name(&self) -> &str {
        &self.model_name
    }
}

#[async_trait]
impl JsonMode for GeminiClient {
    async fn generate_json(
        &self,
        req: &GenerateRequest,
        schema: &serde_json::Value,
    ) -> ChalkboardResult<serde_json::Value> {
        let model_name = req.model.clone().unwrap_or_else(|| self.model_name.clone());

        let (contents, system_instruction) = Self::to_rest_contents(req)?;
        let request = GenerateContentRequest {
            contents,
            system_instruction,
            generation_config: Some(GenerationConfig {
                temperature: req.temperature,
                max_output_tokens: req.max_tokens.map(|t| t as i32),
                response_mime_type: Some("application/json".to_string()),
                response_schema: Some(schema.clone()),
                ..Default::default()
            }),
            tools: None,
        };

        let limiter = self.limiter_for(&model_name);
        let _guard = limiter.acquire(Self::request_token_estimate(req)).await;

        let response = self.rest.generate_content(&model_name, &request).await?;
        let text = Self::response_text(&response)
            .ok_or_else(|| GeminiError::new(GeminiErrorKind::MissingOutput("json".to_string())))?;

        // The model usually honors response_mime_type, but fall back to
        // extraction when it wraps the payload in a code fence anyway.
        match serde_json::from_str(&text) {
            Ok(value) => Ok(value),
            Err(_) => {
                let extracted = extract_json(&text)?;
                serde_json::from_str(&extracted).map_err(|e| {
                    GeminiError::new(GeminiErrorKind::MissingOutput(format!(
                        "json ({})",
                        e
                    )))
                    .into()
                })
            }
        }
    }
}

#[async_trait]
impl ToolUse for GeminiClient {
    async fn generate_with_tools(
        &self,
        req: &GenerateRequest,
        tools: &[ToolDefinition],
    ) -> ChalkboardResult<GenerateResponse> {
        let model_name = req.model.clone().unwrap_or_else(|| self.model_name.clone());

        let (contents, system_instruction) = Self::to_rest_contents(req)?;
        let request = GenerateContentRequest {
            contents,
            system_instruction,
            generation_config: Some(GenerationConfig {
                temperature: req.temperature,
                max_output_tokens: req.max_tokens.map(|t| t as i32),
                ..Default::default()
            }),
            tools: Some(vec![ToolDeclarations {
                function_declarations: tools
                    .iter()
                    .map(|t| FunctionDeclaration {
                        name: t.name.clone(),
                        description: t.description.clone(),
                        parameters: t.parameters.clone(),
                    })
                    .collect(),
            }]),
        };

        let limiter = self.limiter_for(&model_name);
        let _guard = limiter.acquire(Self::request_token_estimate(req)).await;

        let response = self.rest.generate_content(&model_name, &request).await?;

        let mut outputs = Vec::new();
        let mut calls = Vec::new();

        for part in response.parts() {
            if let Some(text) = &part.text {
                outputs.push(Output::Text(text.clone()));
            }
            if let Some(call) = &part.function_call {
                calls.push(ToolCall {
                    id: uuid::Uuid::new_v4().to_string(),
                    name: call.name.clone(),
                    arguments: call.args.clone(),
                });
            }
        }

        if !calls.is_empty() {
            outputs.push(Output::ToolCalls(calls));
        }

        if outputs.is_empty() {
            warn!(model = %model_name, "Tool-use response contained neither text nor calls");
            return Err(
                GeminiError::new(GeminiErrorKind::MissingOutput("text".to_string())).into(),
            );
        }

        Ok(GenerateResponse { outputs })
    }
}

#[async_trait]
impl ImageGeneration for GeminiClient {
    async fn generate_image(&self, prompt: &str) -> ChalkboardResult<Output> {
        let request = GenerateContentRequest {
            contents: vec![super::rest::Content {
                role: Some("user".to_string()),
                parts: vec![Part::text(prompt)],
            }],
            system_instruction: None,
            generation_config: Some(GenerationConfig {
                // The image model requires both modalities; IMAGE alone fails.
                response_modalities: Some(vec!["TEXT".to_string(), "IMAGE".to_string()]),
                ..Default::default()
            }),
            tools: None,
        };

        let limiter = self.limiter_for(IMAGE_MODEL);
        let _guard = limiter.acquire(Self::estimate_tokens(prompt)).await;

        let response = self.rest.generate_content(IMAGE_MODEL, &request).await?;
        let (mime, data) = Self::response_inline_media(&response)?.ok_or_else(|| {
            GeminiError::new(GeminiErrorKind::MissingOutput("image".to_string()))
        })?;

        Ok(Output::Image {
            mime: Some(mime),
            data,
        })
    }
}

#[async_trait]
impl SpeechSynthesis for GeminiClient {
    async fn synthesize(&self, text: &str) -> ChalkboardResult<Output> {
        let request = GenerateContentRequest {
            contents: vec![super::rest::Content {
                role: Some("user".to_string()),
                parts: vec![Part::text(text)],
            }],
            system_instruction: None,
            generation_config: Some(GenerationConfig {
                response_modalities: Some(vec!["AUDIO".to_string()]),
                ..Default::default()
            }),
            tools: None,
        };

        let limiter = self.limiter_for(TTS_MODEL);
        let _guard = limiter.acquire(Self::estimate_tokens(text)).await;

        let response = self.rest.generate_content(TTS_MODEL, &request).await?;
        let (mime, data) = Self::response_inline_media(&response)?.ok_or_else(|| {
            GeminiError::new(GeminiErrorKind::MissingOutput("audio".to_string()))
        })?;

        Ok(Output::Audio {
            mime: Some(mime),
            data,
        })
    }
}

#[async_trait]
impl VideoGeneration for GeminiClient {
    async fn start_video(&self, job: &VideoJobRequest) -> ChalkboardResult<OperationHandle> {
        let model = job.model.as_deref().unwrap_or(VIDEO_MODEL);

        let image = job.reference_image.as_ref().map(|img| ImageInstance {
            bytes_base64_encoded: STANDARD.encode(&img.data),
            mime_type: img.mime.clone(),
        });

        let has_parameters = job.duration_seconds.is_some() || job.aspect_ratio.is_some();
        let request = PredictLongRunningRequest {
            instances: vec![VideoInstance {
                prompt: job.prompt.clone(),
                image,
            }],
            parameters: has_parameters.then(|| VideoParameters {
                duration_seconds: job.duration_seconds,
                aspect_ratio: job.aspect_ratio.clone(),
            }),
        };

        let limiter = self.limiter_for(model);
        let _guard = limiter.acquire(Self::estimate_tokens(&job.prompt)).await;

        let name = self.rest.predict_long_running(model, &request).await?;
        Ok(OperationHandle { name })
    }

    async fn check_operation(
        &self,
        handle: &OperationHandle,
    ) -> ChalkboardResult<OperationStatus> {
        let operation = self.rest.get_operation(&handle.name).await?;

        if let Some(error) = operation.error {
            return Ok(OperationStatus {
                done: true,
                error: Some(error.message),
                video: None,
            });
        }

        if !operation.done {
            return Ok(OperationStatus::default());
        }

        let uri = operation
            .response
            .as_ref()
            .and_then(|r| r.generate_video_response.as_ref())
            .and_then(|r| r.generated_samples.first())
            .and_then(|s| s.video.as_ref())
            .and_then(|v| v.uri.clone())
            .ok_or_else(|| {
                GeminiError::new(GeminiErrorKind::MissingOutput("video".to_string()))
            })?;

        let data = self.rest.download(&uri).await?;
        Ok(OperationStatus {
            done: true,
            error: None,
            video: Some(MediaPayload {
                mime: "video/mp4".to_string(),
                data,
            }),
        })
    }
}
