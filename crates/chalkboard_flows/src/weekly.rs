//! Weekly teaching plan flow.

use chalkboard_core::{GenerateRequest, Message, Role};
use chalkboard_error::{ChalkboardResult, SchemaError, SchemaErrorKind};
use chalkboard_interface::Driver;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Caller input for weekly plan generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyPlanRequest {
    /// Teaching goals for the week: subjects, topics, desired outcomes
    pub teaching_goals: String,
    /// Time restrictions, resource limitations, or student needs
    pub constraints: String,
    /// The language the plan should be written in
    pub language: String,
}

impl WeeklyPlanRequest {
    /// Validate the request against its declared schema.
    pub fn validate(&self) -> ChalkboardResult<()> {
        if self.teaching_goals.trim().is_empty() {
            return Err(SchemaError::new(SchemaErrorKind::TooShort {
                field: "teaching_goals",
                min: 1,
            })
            .into());
        }
        if self.language.trim().is_empty() {
            return Err(SchemaError::new(SchemaErrorKind::TooShort {
                field: "language",
                min: 1,
            })
            .into());
        }
        Ok(())
    }
}

/// A generated weekly teaching plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyPlan {
    /// A detailed, human-readable plan with daily activities and assessments
    pub weekly_plan: String,
}

/// Generate a weekly teaching plan from goals and constraints.
#[instrument(skip(driver, request), fields(language = %request.language))]
pub async fn generate_weekly_plan<D>(
    driver: &D,
    request: &WeeklyPlanRequest,
) -> ChalkboardResult<WeeklyPlan>
where
    D: Driver + ?Sized,
{
    request.validate()?;

    let prompt = format!(
        "You are an AI assistant designed to help teachers create weekly teaching plans.\n\n\
         Based on the provided teaching goals and constraints, generate a detailed weekly \
         plan that optimizes time and resources.\n\n\
         The output should be a well-structured and human-readable plan, not a JSON object. \
         Use markdown for formatting if needed.\n\
         The entire plan must be in the following language: {}.\n\n\
         Teaching Goals: {}\n\
         Constraints: {}\n\n\
         Weekly Plan:",
        request.language, request.teaching_goals, request.constraints,
    );

    let generate_request = GenerateRequest {
        messages: vec![Message::text(Role::User, prompt)],
        ..Default::default()
    };

    let response = driver.generate(&generate_request).await?;
    Ok(WeeklyPlan {
        weekly_plan: response.text(),
    })
}
