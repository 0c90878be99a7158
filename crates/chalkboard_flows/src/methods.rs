//! Teaching-method suggestion flow.

use chalkboard_core::{GenerateRequest, Message, Role};
use chalkboard_error::{ChalkboardResult, SchemaError, SchemaErrorKind};
use chalkboard_interface::Driver;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Caller input for teaching-method suggestions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeachingMethodsRequest {
    /// The lesson content
    pub content: String,
    /// The class grade level
    pub grade: String,
    /// The subject of the lesson
    pub subject: String,
}

impl TeachingMethodsRequest {
    /// Validate the request against its declared schema.
    pub fn validate(&self) -> ChalkboardResult<()> {
        if self.content.trim().is_empty() {
            return Err(SchemaError::new(SchemaErrorKind::TooShort {
                field: "content",
                min: 1,
            })
            .into());
        }
        Ok(())
    }
}

/// Suggested teaching methods for a lesson.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeachingMethods {
    /// Suggested methods tailored to the content and student level
    pub teaching_methods: String,
}

/// Suggest simplified teaching methods for the given lesson content.
#[instrument(skip(driver, request), fields(grade = %request.grade, subject = %request.subject))]
pub async fn explain_teaching_methods<D>(
    driver: &D,
    request: &TeachingMethodsRequest,
) -> ChalkboardResult<TeachingMethods>
where
    D: Driver + ?Sized,
{
    request.validate()?;

    let prompt = format!(
        "You are an experienced teacher. Given the lesson content, class grade, \
         and subject, suggest simplified teaching methods.\n\n\
         Lesson Content: {}\n\
         Class Grade: {}\n\
         Subject: {}\n\n\
         Suggest teaching methods tailored to the content and student level:",
        request.content, request.grade, request.subject,
    );

    let generate_request = GenerateRequest {
        messages: vec![Message::text(Role::User, prompt)],
        ..Default::default()
    };

    let response = driver.generate(&generate_request).await?;
    Ok(TeachingMethods {
        teaching_methods: response.text(),
    })
}
