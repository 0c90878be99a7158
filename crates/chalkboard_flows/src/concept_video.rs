//! Single concept video flow.

use crate::Poller;
use crate::structured::parse_structured;
use chalkboard_core::{GenerateRequest, Message, Role, decode_data_uri, encode_data_uri};
use chalkboard_error::{ChalkboardResult, SchemaError, SchemaErrorKind};
use chalkboard_interface::{ImageData, JsonMode, VideoGeneration, VideoJobRequest};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{instrument, warn};

/// Supported video aspect ratios.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum AspectRatio {
    /// 16:9 landscape
    #[default]
    #[serde(rename = "16:9")]
    Landscape,
    /// 9:16 portrait
    #[serde(rename = "9:16")]
    Portrait,
}

impl AspectRatio {
    /// The wire form of the ratio (e.g., "16:9").
    pub fn as_str(&self) -> &'static str {
        match self {
            AspectRatio::Landscape => "16:9",
            AspectRatio::Portrait => "9:16",
        }
    }
}

impl std::fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Caller input for concept video generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConceptVideoRequest {
    /// The prompt or topic to generate a video for
    pub prompt: String,
    /// The grade level of the students
    pub grade: String,
    /// The subject of the topic
    pub subject: String,
    /// Clip duration in seconds (5 to 8)
    #[serde(default = "default_duration")]
    pub duration: u32,
    /// The aspect ratio of the video
    #[serde(default)]
    pub aspect_ratio: AspectRatio,
    /// Optional starting image as a `data:<mimetype>;base64,` URI
    pub image: Option<String>,
    /// The video generation model to use
    pub model: String,
}

fn default_duration() -> u32 {
    5
}

/// Models that accept duration and aspect-ratio parameters.
const PARAMETERIZED_MODEL: &str = "veo-2.0-generate-001";

impl ConceptVideoRequest {
    /// Validate the request against its declared schema.
    pub fn validate(&self) -> ChalkboardResult<()> {
        if self.prompt.trim().is_empty() {
            return Err(SchemaError::new(SchemaErrorKind::TooShort {
                field: "prompt",
                min: 1,
            })
            .into());
        }
        if !(5..=8).contains(&self.duration) {
            return Err(SchemaError::new(SchemaErrorKind::OutOfRange {
                field: "duration",
                min: 5,
                max: 8,
                value: i64::from(self.duration),
            })
            .into());
        }
        if let Some(image) = &self.image
            && let Err(e) = decode_data_uri(image)
        {
            return Err(SchemaError::new(SchemaErrorKind::InvalidDataUri {
                field: "image",
                reason: e.to_string(),
            })
            .into());
        }
        Ok(())
    }
}

/// A generated concept video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConceptVideo {
    /// The title of the generated video
    pub title: String,
    /// A brief description of the video content
    pub description: String,
    /// The generated video as a `data:video/mp4;base64,` URI
    pub video_url: String,
}

#[derive(Debug, Deserialize)]
struct TitleAndDescription {
    title: String,
    description: String,
}

fn title_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "title": { "type": "string" },
            "description": { "type": "string" }
        },
        "required": ["title", "description"]
    })
}

/// Generate a short educational video for a concept.
///
/// Stage 1 produces a title and one-sentence description; a missing
/// structured output here falls back to the prompt text rather than
/// aborting. Stage 2 submits the video job and polls it to completion.
///
/// # Errors
///
/// - Validation errors on malformed input, before any remote call
/// - The job's own error, a polling timeout, or a transport failure from
///   the video stage
#[instrument(skip(driver, request, poller), fields(model = %request.model, duration = request.duration))]
pub async fn generate_concept_video<D>(
    driver: &D,
    request: &ConceptVideoRequest,
    poller: &Poller,
) -> ChalkboardResult<ConceptVideo>
where
    D: JsonMode + VideoGeneration + ?Sized,
{
    request.validate()?;

    // Stage 1: title and description
    let title_prompt = format!(
        "Create a concise title and a one-sentence description for an educational \
         video about \"{}\" for a {} {} student.",
        request.prompt, request.grade, request.subject,
    );
    let title_request = GenerateRequest {
        messages: vec![Message::text(Role::User, title_prompt)],
        ..Default::default()
    };

    let (title, description) = match driver
        .generate_json(&title_request, &title_schema())
        .await
        .and_then(|value| parse_structured::<TitleAndDescription>("title", value))
    {
        Ok(parsed) => (parsed.title, parsed.description),
        Err(e) => {
            warn!(error = %e, "Title stage returned no structured output, using defaults");
            (request.prompt.clone(), "An educational video.".to_string())
        }
    };

    // Stage 2: the video itself
    let video_prompt = format!(
        "A short, engaging, and educational video for a {} student studying {}. \
         The video should visually represent this concept: \"{}\". Style: vibrant, \
         simple, and easy-to-understand for educational purposes.",
        request.grade, request.subject, request.prompt,
    );

    let reference_image = match &request.image {
        Some(uri) => {
            let (mime, data) = decode_data_uri(uri)?;
            Some(ImageData { mime, data })
        }
        None => None,
    };

    // Only pass clip parameters to models that understand them.
    let parameterized = request.model == PARAMETERIZED_MODEL;
    let job = VideoJobRequest {
        prompt: video_prompt,
        reference_image,
        duration_seconds: parameterized.then_some(request.duration),
        aspect_ratio: parameterized.then(|| request.aspect_ratio.as_str().to_string()),
        model: Some(request.model.clone()),
    };

    let handle = driver.start_video(&job).await?;
    let video = poller.wait(driver, &handle).await?;

    Ok(ConceptVideo {
        title,
        description,
        video_url: encode_data_uri(&video.mime, &video.data),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> ConceptVideoRequest {
        ConceptVideoRequest {
            prompt: "Photosynthesis".to_string(),
            grade: "Grade 6".to_string(),
            subject: "Science".to_string(),
            duration: 5,
            aspect_ratio: AspectRatio::Landscape,
            image: None,
            model: "veo-2.0-generate-001".to_string(),
        }
    }

    #[test]
    fn rejects_out_of_range_duration() {
        let mut r = request();
        r.duration = 12;
        assert!(r.validate().is_err());
    }

    #[test]
    fn rejects_malformed_seed_image() {
        let mut r = request();
        r.image = Some("http://example.com/cat.png".to_string());
        assert!(r.validate().is_err());
    }

    #[test]
    fn aspect_ratio_serializes_to_wire_form() {
        assert_eq!(
            serde_json::to_string(&AspectRatio::Portrait).unwrap(),
            "\"9:16\""
        );
        let parsed: AspectRatio = serde_json::from_str("\"16:9\"").unwrap();
        assert_eq!(parsed, AspectRatio::Landscape);
    }
}
