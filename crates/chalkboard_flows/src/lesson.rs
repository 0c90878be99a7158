//! Lesson plan creation flow.
//!
//! Delegates to the teaching-method, quiz, and concept-image flows in
//! parallel, then synthesizes their outputs into one lesson plan document.

use crate::concept_image::{ConceptImageRequest, generate_concept_images};
use crate::methods::{TeachingMethodsRequest, explain_teaching_methods};
use crate::quiz::{QuizRequest, generate_quiz};
use chalkboard_core::{GenerateRequest, Message, Role};
use chalkboard_error::{ChalkboardResult, SchemaError, SchemaErrorKind};
use chalkboard_interface::{Driver, ImageGeneration, JsonMode};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

/// How many assessment questions the embedded quiz carries.
const QUIZ_QUESTIONS: u32 = 3;

/// Caller input for lesson plan creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LessonPlanRequest {
    /// The central topic for the lesson plan
    pub topic: String,
    /// The grade level of the students
    pub grade: String,
    /// The subject of the lesson
    pub subject: String,
}

impl LessonPlanRequest {
    /// Validate the request against its declared schema.
    pub fn validate(&self) -> ChalkboardResult<()> {
        if self.topic.trim().is_empty() {
            return Err(SchemaError::new(SchemaErrorKind::TooShort {
                field: "topic",
                min: 1,
            })
            .into());
        }
        Ok(())
    }
}

/// A synthesized lesson plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LessonPlan {
    /// The complete lesson plan in Markdown format
    pub lesson_plan: String,
    /// A relevant generated image as a data URI (empty if none was produced)
    pub image_url: String,
}

/// Create a comprehensive lesson plan for a topic.
///
/// Fans out to the teaching-method, quiz, and concept-image flows in
/// parallel, then issues a synthesis call combining their results.
#[instrument(skip(driver, request), fields(topic = %request.topic, grade = %request.grade))]
pub async fn create_lesson_plan<D>(
    driver: &D,
    request: &LessonPlanRequest,
) -> ChalkboardResult<LessonPlan>
where
    D: JsonMode + ImageGeneration + ?Sized,
{
    request.validate()?;
    info!("Lesson plan orchestration started");

    // Delegate to the specialized flows in parallel
    let methods_request = TeachingMethodsRequest {
        content: request.topic.clone(),
        grade: request.grade.clone(),
        subject: request.subject.clone(),
    };
    let quiz_request = QuizRequest {
        topic: request.topic.clone(),
        grade_level: Some(request.grade.clone()),
        subject: Some(request.subject.clone()),
        number_of_questions: QUIZ_QUESTIONS,
    };
    let image_request = ConceptImageRequest {
        concept_description: request.topic.clone(),
    };

    let (methods, quiz, images) = tokio::try_join!(
        explain_teaching_methods(driver, &methods_request),
        generate_quiz(driver, &quiz_request),
        generate_concept_images(driver, &image_request),
    )?;

    let quiz_text = quiz
        .questions
        .iter()
        .enumerate()
        .map(|(i, q)| {
            format!(
                "{}. {}\nOptions: {}\nAnswer: {}",
                i + 1,
                q.question,
                q.options.join(", "),
                q.answer
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    let image_url = images
        .steps
        .first()
        .map(|step| step.image_url.clone())
        .unwrap_or_default();

    // Synthesize the results into a single document
    info!("Synthesizing results from all delegate flows");
    let synthesis_prompt = format!(
        "You are a master educator responsible for creating a final, comprehensive \
         lesson plan.\n\
         You have received input from several specialized AI agents. Your task is to \
         synthesize this information into a single, cohesive, and well-structured \
         lesson plan document in Markdown format.\n\n\
         Topic: {}\n\
         Grade Level: {}\n\
         Subject: {}\n\n\
         Here is the information from your assistant agents:\n\n\
         1.  **Suggested Teaching Methods & Activities:**\n    {}\n\n\
         2.  **Generated Assessment Quiz:**\n    {}\n\n\
         Please create a lesson plan that includes:\n\
         - A clear title.\n\
         - Learning objectives.\n\
         - A list of materials (mentioning the generated image).\n\
         - A step-by-step procedure for the lesson, incorporating the suggested activities.\n\
         - The assessment quiz you've created.\n\
         - A concluding summary.\n\n\
         Format the entire output as a clean, readable Markdown document.",
        request.topic, request.grade, request.subject, methods.teaching_methods, quiz_text,
    );

    let synthesis_request = GenerateRequest {
        messages: vec![Message::text(Role::User, synthesis_prompt)],
        ..Default::default()
    };
    let synthesis = driver.generate(&synthesis_request).await?;

    Ok(LessonPlan {
        lesson_plan: synthesis.text(),
        image_url,
    })
}
