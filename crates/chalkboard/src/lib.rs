//! Chalkboard: educator-facing generative AI flows over the Gemini API.
//!
//! This facade re-exports the workspace surface: core DTOs, capability
//! traits, the Gemini provider, the task flows (quiz, lesson plan,
//! storybook, concept media), the tool-using assistant, the realtime voice
//! bridge, and the student roster.
//!
//! # Example
//!
//! ```no_run
//! use chalkboard::{GeminiClient, QuizRequest, generate_quiz};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = GeminiClient::new_with_config(None)?;
//!
//! let request = QuizRequest {
//!     topic: "Water Cycle".to_string(),
//!     grade_level: Some("Grade 4".to_string()),
//!     subject: Some("Science".to_string()),
//!     number_of_questions: 3,
//! };
//! let quiz = generate_quiz(&client, &request).await?;
//! assert_eq!(quiz.questions.len(), 3);
//! # Ok(())
//! # }
//! ```
//!
//! # Feature availability
//!
//! Generation features require `GEMINI_API_KEY` in the environment. Check
//! [`GeminiClient::available`] and disable the corresponding surfaces when
//! it returns false; constructors fail with an explicit missing-key error
//! rather than silently.

#![forbid(unsafe_code)]

pub use chalkboard_core::{
    GenerateRequest, GenerateResponse, Input, MediaSource, Message, Output, Role, ToolCall,
    decode_data_uri, encode_data_uri, init_telemetry, pcm_to_wav,
};
pub use chalkboard_error::{ChalkboardError, ChalkboardErrorKind, ChalkboardResult};
pub use chalkboard_flows::{
    AnalyzeStoryRequest, AspectRatio, ConceptImageRequest, ConceptImages, ConceptVideo,
    ConceptVideoRequest, LessonPlan, LessonPlanRequest, Poller, Quiz, QuizQuestion, QuizRequest,
    SceneDescriptor, StoryAnalysis, Storybook, StorybookRequest, StorybookScene, TeachingMethods,
    TeachingMethodsRequest, WeeklyPlan, WeeklyPlanRequest, analyze_story, create_lesson_plan,
    explain_teaching_methods, generate_concept_images, generate_concept_video, generate_quiz,
    generate_storybook, generate_weekly_plan,
};
pub use chalkboard_interface::{
    Driver, ImageGeneration, JsonMode, OperationHandle, OperationStatus, SpeechSynthesis,
    ToolDefinition, ToolUse, VideoGeneration, VideoJobRequest,
};
pub use chalkboard_live::{LiveBridge, SessionRegistry};
pub use chalkboard_models::{GeminiClient, GeminiLiveClient};
pub use chalkboard_rate_limit::{ChalkboardConfig, RateLimiter, Tier, TierConfig};
pub use chalkboard_roster::{
    MemoryRoster, QuizResult, RosterStore, Student, StudentStatus, StudentSummary, open_roster,
};
pub use chalkboard_tools::{
    AssistantRequest, AssistantResponse, AssistantTool, ResearchReport, ResearchRequest,
    ResearchSource, ToolRegistry, run_assistant, run_research,
};
