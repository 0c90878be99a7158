//! Story analysis flow.
//!
//! The first step of storybook generation: break a story into ordered
//! scenes with narration text and illustration prompts.

use crate::structured::parse_structured;
use chalkboard_core::{GenerateRequest, Message, Role};
use chalkboard_error::{ChalkboardResult, FlowError, FlowErrorKind, SchemaError, SchemaErrorKind};
use chalkboard_interface::JsonMode;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::instrument;

/// Minimum story length in characters.
const MIN_STORY_LEN: usize = 20;

/// Caller input for story analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzeStoryRequest {
    /// The full text of the story to be animated
    pub story: String,
    /// The grade level of the target audience
    pub grade: String,
}

impl AnalyzeStoryRequest {
    /// Validate the request against its declared schema.
    pub fn validate(&self) -> ChalkboardResult<()> {
        if self.story.trim().len() < MIN_STORY_LEN {
            return Err(SchemaError::new(SchemaErrorKind::TooShort {
                field: "story",
                min: MIN_STORY_LEN,
            })
            .into());
        }
        Ok(())
    }
}

/// One unit of the decomposed narrative.
///
/// Scene order is significant: the sequence produced here drives every
/// downstream per-scene stage and is preserved end-to-end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneDescriptor {
    /// A concise summary of the action in this scene
    pub scene_description: String,
    /// The characters present in this scene
    pub characters: Vec<String>,
    /// The location or setting of the scene
    pub setting: String,
    /// The mood or emotion of the scene
    pub mood: String,
    /// The exact narration text, including attributed dialogue
    pub narration_text: String,
    /// A detailed prompt for generating a consistent illustration
    pub illustration_prompt: String,
}

/// Structured breakdown of a story.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryAnalysis {
    /// A creative title for the story
    pub title: String,
    /// The name of the main character
    pub main_character: String,
    /// Prompt for a consistent character reference sheet
    pub character_sheet_prompt: String,
    /// The scenes that make up the story, in order
    pub scenes: Vec<SceneDescriptor>,
}

fn analysis_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "title": { "type": "string" },
            "main_character": { "type": "string" },
            "character_sheet_prompt": { "type": "string" },
            "scenes": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "scene_description": { "type": "string" },
                        "characters": { "type": "array", "items": { "type": "string" } },
                        "setting": { "type": "string" },
                        "mood": { "type": "string" },
                        "narration_text": { "type": "string" },
                        "illustration_prompt": { "type": "string" }
                    },
                    "required": [
                        "scene_description",
                        "characters",
                        "setting",
                        "mood",
                        "narration_text",
                        "illustration_prompt"
                    ]
                }
            }
        },
        "required": ["title", "main_character", "character_sheet_prompt", "scenes"]
    })
}

/// Analyze a story and break it down into scenes.
///
/// # Errors
///
/// - Validation errors on malformed input, before any remote call
/// - Missing-structured-output errors when the model fails to produce an
///   analysis, or produces one with no scenes
#[instrument(skip(driver, request), fields(grade = %request.grade, story_len = request.story.len()))]
pub async fn analyze_story<D>(
    driver: &D,
    request: &AnalyzeStoryRequest,
) -> ChalkboardResult<StoryAnalysis>
where
    D: JsonMode + ?Sized,
{
    request.validate()?;

    let prompt = format!(
        "You are a master storyteller and film director. Analyze the following story \
         and break it down into distinct scenes. For each scene, define the characters, \
         setting, mood, and create a detailed illustration prompt. Ensure character \
         consistency by first creating a character sheet prompt for the main character, \
         and referencing it in each scene's illustration prompt. Also, extract the exact \
         narration text for each scene, including speaker dialogue.\n\n\
         Story: \"{}\"\n\
         Grade Level: {}\n\
         Art Style: Charming children's storybook illustration, soft watercolor style, \
         vibrant but gentle colors, rounded shapes, no sharp edges.\n\n\
         Produce a structured analysis based on the above.",
        request.story, request.grade,
    );

    let generate_request = GenerateRequest {
        messages: vec![Message::text(Role::User, prompt)],
        ..Default::default()
    };

    let value = driver
        .generate_json(&generate_request, &analysis_schema())
        .await?;
    let analysis: StoryAnalysis = parse_structured("analysis", value)?;

    if analysis.scenes.is_empty() {
        return Err(FlowError::new(FlowErrorKind::MissingStructuredOutput {
            stage: "analysis",
            message: "analysis contained no scenes".to_string(),
        })
        .into());
    }

    Ok(analysis)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_short_story() {
        let request = AnalyzeStoryRequest {
            story: "Too short.".to_string(),
            grade: "Grade 3".to_string(),
        };
        assert!(request.validate().is_err());
    }
}
