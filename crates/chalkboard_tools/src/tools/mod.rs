//! Built-in tool implementations.

mod calendar;
mod email;
mod note;
mod search;

pub use calendar::AddCalendarEventTool;
pub use email::SendEmailTool;
pub use note::AddKeepNoteTool;
pub use search::WebSearchTool;

use chalkboard_error::{ChalkboardResult, JsonError};
use serde_json::Value;

/// Deserialize a tool's JSON input into its typed parameter struct.
pub(crate) fn typed_input<T: serde::de::DeserializeOwned>(
    tool: &str,
    input: Value,
) -> ChalkboardResult<T> {
    serde_json::from_value(input)
        .map_err(|e| JsonError::new(format!("Invalid input for tool '{}': {}", tool, e)).into())
}
