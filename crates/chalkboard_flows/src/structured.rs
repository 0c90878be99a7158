//! Coercion of model JSON into typed flow outputs.

use chalkboard_error::{ChalkboardResult, FlowError, FlowErrorKind};

/// Deserialize a structured model response into a typed value.
///
/// # Errors
///
/// Returns a missing-structured-output error naming the stage when the
/// value does not match the expected shape.
pub(crate) fn parse_structured<T>(stage: &'static str, value: serde_json::Value) -> ChalkboardResult<T>
where
    T: serde::de::DeserializeOwned,
{
    serde_json::from_value(value).map_err(|e| {
        tracing::error!(stage, error = %e, "Structured output did not match schema");
        FlowError::new(FlowErrorKind::MissingStructuredOutput {
            stage,
            message: e.to_string(),
        })
        .into()
    })
}
