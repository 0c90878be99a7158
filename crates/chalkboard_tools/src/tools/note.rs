//! Note-taking tool.

use crate::registry::AssistantTool;
use crate::tools::typed_input;
use chalkboard_error::ChalkboardResult;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::info;

/// Typed input for [`AddKeepNoteTool`].
#[derive(Debug, Deserialize)]
struct KeepNoteInput {
    title: String,
    #[allow(dead_code)]
    content: String,
}

/// Creates a new note in Google Keep.
///
/// Simulated: the action is logged and a confirmation string returned.
pub struct AddKeepNoteTool;

#[async_trait::async_trait]
impl AssistantTool for AddKeepNoteTool {
    fn name(&self) -> &str {
        "add_keep_note"
    }

    fn description(&self) -> &str {
        "Creates a new note in Google Keep."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "title": {
                    "type": "string",
                    "description": "The title of the note."
                },
                "content": {
                    "type": "string",
                    "description": "The body content of the note."
                }
            },
            "required": ["title", "content"]
        })
    }

    async fn execute(&self, input: Value) -> ChalkboardResult<Value> {
        let note: KeepNoteInput = typed_input(self.name(), input)?;
        info!(title = %note.title, "Simulating Keep note creation");

        Ok(Value::String(format!(
            "Successfully created a new note in Google Keep with the title \"{}\".",
            note.title
        )))
    }
}
