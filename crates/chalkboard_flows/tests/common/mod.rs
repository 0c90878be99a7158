//! Scripted driver standing in for the remote provider.

// Each test binary compiles its own copy; not every binary uses every helper.
#![allow(dead_code)]

use async_trait::async_trait;
use chalkboard_core::{GenerateRequest, GenerateResponse, Output};
use chalkboard_error::{ChalkboardResult, GeminiError, GeminiErrorKind};
use chalkboard_interface::{
    Driver, ImageGeneration, JsonMode, MediaPayload, OperationHandle, OperationStatus,
    SpeechSynthesis, ToolDefinition, ToolUse, VideoGeneration, VideoJobRequest,
};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Marker in a narration text that makes speech synthesis fail.
pub const FAIL_AUDIO: &str = "[fail-audio]";
/// Marker in an illustration prompt that makes video submission fail.
pub const FAIL_VIDEO: &str = "[fail-video]";

/// A deterministic driver: structured outputs are scripted per call, media
/// stages succeed with canned bytes unless a failure marker is present.
#[derive(Default)]
pub struct ScriptedDriver {
    /// Structured outputs, popped per generate_json call
    pub json_outputs: Mutex<VecDeque<serde_json::Value>>,
    /// Operation statuses, popped per check_operation call
    pub operation_statuses: Mutex<VecDeque<OperationStatus>>,
    /// Fail the image stage
    pub fail_images: bool,
    pub generate_calls: AtomicUsize,
    pub json_calls: AtomicUsize,
    pub image_calls: AtomicUsize,
    pub synthesize_calls: AtomicUsize,
    pub start_video_calls: AtomicUsize,
    pub check_calls: AtomicUsize,
}

impl ScriptedDriver {
    pub fn with_json_outputs(outputs: Vec<serde_json::Value>) -> Self {
        Self {
            json_outputs: Mutex::new(outputs.into()),
            ..Default::default()
        }
    }

    /// A status that reports a finished job carrying a tiny video payload.
    pub fn done_status() -> OperationStatus {
        OperationStatus {
            done: true,
            error: None,
            video: Some(MediaPayload {
                mime: "video/mp4".to_string(),
                data: vec![0u8; 8],
            }),
        }
    }

    pub fn pending_status() -> OperationStatus {
        OperationStatus::default()
    }
}

#[async_trait]
impl Driver for ScriptedDriver {
    async fn generate(&self, _req: &GenerateRequest) -> ChalkboardResult<GenerateResponse> {
        self.generate_calls.fetch_add(1, Ordering::SeqCst);
        Ok(GenerateResponse {
            outputs: vec![Output::Text("scripted response".to_string())],
        })
    }

    fn provider_name(&self) -> &'static str {
        "scripted"
    }

    fn model_name(&self) -> &str {
        "scripted-model"
    }
}

#[async_trait]
impl JsonMode for ScriptedDriver {
    async fn generate_json(
        &self,
        _req: &GenerateRequest,
        _schema: &serde_json::Value,
    ) -> ChalkboardResult<serde_json::Value> {
        self.json_calls.fetch_add(1, Ordering::SeqCst);
        self.json_outputs.lock().unwrap().pop_front().ok_or_else(|| {
            GeminiError::new(GeminiErrorKind::MissingOutput("json".to_string())).into()
        })
    }
}

#[async_trait]
impl ToolUse for ScriptedDriver {
    async fn generate_with_tools(
        &self,
        _req: &GenerateRequest,
        _tools: &[ToolDefinition],
    ) -> ChalkboardResult<GenerateResponse> {
        Ok(GenerateResponse {
            outputs: vec![Output::Text("scripted tool response".to_string())],
        })
    }
}

#[async_trait]
impl ImageGeneration for ScriptedDriver {
    async fn generate_image(&self, _prompt: &str) -> ChalkboardResult<Output> {
        self.image_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_images {
            return Err(GeminiError::new(GeminiErrorKind::ApiRequest(
                "image backend unavailable".to_string(),
            ))
            .into());
        }
        Ok(Output::Image {
            mime: Some("image/png".to_string()),
            data: vec![0x89, 0x50, 0x4E, 0x47],
        })
    }
}

#[async_trait]
impl SpeechSynthesis for ScriptedDriver {
    async fn synthesize(&self, text: &str) -> ChalkboardResult<Output> {
        self.synthesize_calls.fetch_add(1, Ordering::SeqCst);
        if text.contains(FAIL_AUDIO) {
            return Err(GeminiError::new(GeminiErrorKind::ApiRequest(
                "speech backend unavailable".to_string(),
            ))
            .into());
        }
        Ok(Output::Audio {
            mime: Some("audio/L16;rate=24000".to_string()),
            data: vec![0u8; 16],
        })
    }
}

#[async_trait]
impl VideoGeneration for ScriptedDriver {
    async fn start_video(&self, job: &VideoJobRequest) -> ChalkboardResult<OperationHandle> {
        let n = self.start_video_calls.fetch_add(1, Ordering::SeqCst);
        if job.prompt.contains(FAIL_VIDEO) {
            return Err(GeminiError::new(GeminiErrorKind::ApiRequest(
                "video quota exceeded".to_string(),
            ))
            .into());
        }
        Ok(OperationHandle {
            name: format!("operations/test-{}", n),
        })
    }

    async fn check_operation(
        &self,
        _handle: &OperationHandle,
    ) -> ChalkboardResult<OperationStatus> {
        self.check_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .operation_statuses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(ScriptedDriver::done_status))
    }
}

/// A scripted story analysis with the given narration texts and
/// illustration prompts, one scene per pair.
pub fn analysis_json(scenes: &[(&str, &str)]) -> serde_json::Value {
    let scene_values: Vec<serde_json::Value> = scenes
        .iter()
        .map(|(narration, illustration)| {
            serde_json::json!({
                "scene_description": "a scene",
                "characters": ["Leo"],
                "setting": "forest",
                "mood": "calm",
                "narration_text": narration,
                "illustration_prompt": illustration,
            })
        })
        .collect();

    serde_json::json!({
        "title": "Leo the Fox",
        "main_character": "Leo",
        "character_sheet_prompt": "a small red fox, watercolor",
        "scenes": scene_values,
    })
}
