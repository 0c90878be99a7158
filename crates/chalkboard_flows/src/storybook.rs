//! Animated storybook flow.
//!
//! The multi-stage pipeline: analyze the story, generate a character
//! reference sheet, narrate every scene in parallel, then animate every
//! scene sequentially through long-running video jobs, and assemble the
//! results in scene order.

use crate::poll::Poller;
use crate::story::{AnalyzeStoryRequest, analyze_story};
use chalkboard_core::{Output, encode_data_uri, pcm_to_wav};
use chalkboard_error::{ChalkboardResult, FlowError, FlowErrorKind};
use chalkboard_interface::{
    ImageData, ImageGeneration, JsonMode, SpeechSynthesis, VideoGeneration, VideoJobRequest,
};
use futures::future::try_join_all;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

/// Caller input for storybook generation.
pub type StorybookRequest = AnalyzeStoryRequest;

/// One assembled scene of the storybook.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorybookScene {
    /// Narrated audio for the scene as a `data:audio/wav;base64,` URI
    pub narration_audio: String,
    /// Generated video for the scene as a `data:video/mp4;base64,` URI
    pub video_url: String,
    /// The narration text the audio was synthesized from
    pub narration_text: String,
}

/// The assembled storybook.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Storybook {
    /// The story title from the analysis stage
    pub title: String,
    /// The scenes, in the same order as the analysis scene list
    pub scenes: Vec<StorybookScene>,
}

/// Generate an animated storybook from a story text.
///
/// Stages:
/// 1. Story analysis (required). A missing structured output aborts.
/// 2. Character reference sheet (optional). On failure the remaining stages
///    proceed without the reference.
/// 3. Per-scene narration audio, generated in parallel and re-assembled in
///    scene order.
/// 4. Per-scene video, generated strictly one at a time in scene order;
///    each job is polled at the poller's fixed interval until it completes
///    or reports an error.
/// 5. Assembly keyed by scene index.
///
/// Partial results are never returned: the first failure of a required
/// stage aborts the whole flow with an error naming the stage and scene.
#[instrument(skip(driver, request, poller), fields(grade = %request.grade))]
pub async fn generate_storybook<D>(
    driver: &D,
    request: &StorybookRequest,
    poller: &Poller,
) -> ChalkboardResult<Storybook>
where
    D: JsonMode + ImageGeneration + SpeechSynthesis + VideoGeneration + ?Sized,
{
    // Stage 1: break the story into scenes
    let analysis = analyze_story(driver, request).await?;
    info!(
        title = %analysis.title,
        scenes = analysis.scenes.len(),
        "Story analysis complete"
    );

    // Stage 2: consistent character reference sheet. Non-fatal: scenes are
    // generated without the reference if this fails.
    let character_sheet = match driver.generate_image(&analysis.character_sheet_prompt).await {
        Ok(Output::Image { mime, data }) => Some(ImageData {
            mime: mime.unwrap_or_else(|| "image/png".to_string()),
            data,
        }),
        Ok(_) => {
            warn!("Character sheet stage returned a non-image output, continuing without it");
            None
        }
        Err(e) => {
            warn!(error = %e, "Character sheet generation failed, continuing without it");
            None
        }
    };

    // Stage 3: narration audio for all scenes in parallel, order preserved
    let audio_futures = analysis.scenes.iter().enumerate().map(|(index, scene)| {
        let narration = scene.narration_text.clone();
        async move {
            let output = driver.synthesize(&narration).await.map_err(|e| {
                FlowError::new(FlowErrorKind::SceneFailed {
                    stage: "audio",
                    scene: index + 1,
                    message: e.to_string(),
                })
            })?;

            match output {
                Output::Audio { data, .. } => {
                    let wav = pcm_to_wav(&data, 1, driver.sample_rate_hz(), 16);
                    Ok::<String, FlowError>(encode_data_uri("audio/wav", &wav))
                }
                _ => Err(FlowError::new(FlowErrorKind::SceneFailed {
                    stage: "audio",
                    scene: index + 1,
                    message: "speech synthesis returned no audio".to_string(),
                })),
            }
        }
    });
    let narration_audios = try_join_all(audio_futures).await?;

    // Stage 4: video for each scene, strictly sequential to respect the
    // provider's video quota
    let mut video_urls = Vec::with_capacity(analysis.scenes.len());
    for (index, scene) in analysis.scenes.iter().enumerate() {
        let job = VideoJobRequest {
            prompt: format!(
                "Animate this scene in a gentle, slow-panning Ken Burns style. \
                 Scene description: {}",
                scene.illustration_prompt,
            ),
            reference_image: character_sheet.clone(),
            duration_seconds: Some(8),
            aspect_ratio: Some("16:9".to_string()),
            model: None,
        };

        let handle = driver.start_video(&job).await.map_err(|e| {
            FlowError::new(FlowErrorKind::SceneFailed {
                stage: "video",
                scene: index + 1,
                message: e.to_string(),
            })
        })?;

        let video = poller.wait(driver, &handle).await.map_err(|e| {
            FlowError::new(FlowErrorKind::SceneFailed {
                stage: "video",
                scene: index + 1,
                message: e.to_string(),
            })
        })?;

        video_urls.push(encode_data_uri(&video.mime, &video.data));
    }

    // Stage 5: assemble per-scene results keyed by index
    let scenes = analysis
        .scenes
        .iter()
        .zip(narration_audios)
        .zip(video_urls)
        .map(|((scene, narration_audio), video_url)| StorybookScene {
            narration_audio,
            video_url,
            narration_text: scene.narration_text.clone(),
        })
        .collect();

    Ok(Storybook {
        title: analysis.title,
        scenes,
    })
}
