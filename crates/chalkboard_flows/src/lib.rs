//! Schema-typed generation flows for Chalkboard.
//!
//! A flow is a named unit of work: a typed, validated input, one or more
//! calls to the generative model, and a typed output. Multi-stage flows
//! sequence dependent calls, fan independent calls out in parallel, and
//! poll long-running media jobs until completion.
//!
//! Failure policy: validation errors surface before any remote call; the
//! first failure of a required stage aborts the whole flow with an error
//! naming the stage (and scene, for per-scene stages). Optional stages fail
//! soft with a logged warning. Nothing is retried automatically.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod concept_image;
mod concept_video;
mod lesson;
mod methods;
mod poll;
mod quiz;
mod story;
mod storybook;
mod structured;
mod weekly;

pub use concept_image::{ConceptImageRequest, ConceptImages, ConceptStep, generate_concept_images};
pub use concept_video::{AspectRatio, ConceptVideo, ConceptVideoRequest, generate_concept_video};
pub use lesson::{LessonPlan, LessonPlanRequest, create_lesson_plan};
pub use methods::{TeachingMethods, TeachingMethodsRequest, explain_teaching_methods};
pub use poll::Poller;
pub use quiz::{Quiz, QuizQuestion, QuizRequest, generate_quiz};
pub use story::{AnalyzeStoryRequest, SceneDescriptor, StoryAnalysis, analyze_story};
pub use storybook::{Storybook, StorybookRequest, StorybookScene, generate_storybook};
pub use weekly::{WeeklyPlan, WeeklyPlanRequest, generate_weekly_plan};
