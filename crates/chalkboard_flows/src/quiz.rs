//! Quiz generation flow.

use crate::structured::parse_structured;
use chalkboard_core::{GenerateRequest, Message, Role};
use chalkboard_error::{ChalkboardResult, FlowError, FlowErrorKind, SchemaError, SchemaErrorKind};
use chalkboard_interface::JsonMode;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::instrument;

/// Caller input for quiz generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizRequest {
    /// The topic or lesson content to generate a quiz for
    pub topic: String,
    /// The grade level of the students taking the quiz
    pub grade_level: Option<String>,
    /// The subject the topic belongs to
    #[serde(default)]
    pub subject: Option<String>,
    /// How many questions to generate (1 to 20)
    #[serde(default = "default_question_count")]
    pub number_of_questions: u32,
}

fn default_question_count() -> u32 {
    5
}

impl QuizRequest {
    /// Validate the request against its declared schema.
    ///
    /// # Errors
    ///
    /// Returns a validation error before any remote call is made.
    pub fn validate(&self) -> ChalkboardResult<()> {
        if self.topic.trim().is_empty() {
            return Err(SchemaError::new(SchemaErrorKind::TooShort {
                field: "topic",
                min: 1,
            })
            .into());
        }
        if !(1..=20).contains(&self.number_of_questions) {
            return Err(SchemaError::new(SchemaErrorKind::OutOfRange {
                field: "number_of_questions",
                min: 1,
                max: 20,
                value: i64::from(self.number_of_questions),
            })
            .into());
        }
        Ok(())
    }
}

/// One multiple-choice question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizQuestion {
    /// The question text
    pub question: String,
    /// Candidate answers
    pub options: Vec<String>,
    /// The correct answer; always one of `options`
    pub answer: String,
}

/// A generated quiz.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quiz {
    /// The questions, in presentation order
    pub questions: Vec<QuizQuestion>,
}

fn quiz_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "questions": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "question": { "type": "string" },
                        "options": { "type": "array", "items": { "type": "string" } },
                        "answer": { "type": "string" }
                    },
                    "required": ["question", "options", "answer"]
                }
            }
        },
        "required": ["questions"]
    })
}

/// Generate a quiz for the given topic and grade level.
///
/// The response is well-formed only if it contains exactly the requested
/// number of questions and every answer appears among its question's
/// options; anything else is a missing-structured-output failure.
///
/// # Errors
///
/// - Validation errors on malformed input, before any remote call
/// - Missing-structured-output errors when the model response does not
///   match the quiz schema
#[instrument(skip(driver, request), fields(topic = %request.topic, questions = request.number_of_questions))]
pub async fn generate_quiz<D>(driver: &D, request: &QuizRequest) -> ChalkboardResult<Quiz>
where
    D: JsonMode + ?Sized,
{
    request.validate()?;

    let prompt = format!(
        "You are an AI quiz generator designed to create quizzes for teachers.\n\n\
         Based on the topic and grade level provided, generate a quiz with the \
         specified number of questions.\n\
         The quiz MUST be formatted in a valid JSON structure.\n\
         The JSON object should have a single key \"questions\" which is an array \
         of question objects.\n\
         Each question object should have three keys: \"question\" (string), \
         \"options\" (array of strings), and \"answer\" (string).\n\n\
         Topic: {}\n\
         Grade Level: {}\n\
         Subject: {}\n\
         Number of Questions: {}\n\n\
         Quiz (JSON):",
        request.topic,
        request.grade_level.as_deref().unwrap_or("any"),
        request.subject.as_deref().unwrap_or("any"),
        request.number_of_questions,
    );

    let generate_request = GenerateRequest {
        messages: vec![Message::text(Role::User, prompt)],
        ..Default::default()
    };

    let value = driver.generate_json(&generate_request, &quiz_schema()).await?;
    let quiz: Quiz = parse_structured("quiz", value)?;

    if quiz.questions.len() != request.number_of_questions as usize {
        return Err(FlowError::new(FlowErrorKind::MissingStructuredOutput {
            stage: "quiz",
            message: format!(
                "expected {} questions, got {}",
                request.number_of_questions,
                quiz.questions.len()
            ),
        })
        .into());
    }

    for (index, question) in quiz.questions.iter().enumerate() {
        if !question.options.contains(&question.answer) {
            return Err(FlowError::new(FlowErrorKind::MissingStructuredOutput {
                stage: "quiz",
                message: format!("question {} answer is not among its options", index + 1),
            })
            .into());
        }
    }

    Ok(quiz)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_out_of_range_question_count() {
        let request = QuizRequest {
            topic: "Fractions".to_string(),
            grade_level: None,
            subject: None,
            number_of_questions: 25,
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn rejects_empty_topic() {
        let request = QuizRequest {
            topic: "  ".to_string(),
            grade_level: None,
            subject: None,
            number_of_questions: 5,
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn default_question_count_is_valid() {
        let request: QuizRequest =
            serde_json::from_str(r#"{"topic": "Water Cycle", "grade_level": "Grade 4"}"#).unwrap();
        assert_eq!(request.number_of_questions, 5);
        assert!(request.validate().is_ok());
    }
}
