//! Calendar event tool.

use crate::registry::AssistantTool;
use crate::tools::typed_input;
use chalkboard_error::ChalkboardResult;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::info;

/// Typed input for [`AddCalendarEventTool`].
#[derive(Debug, Deserialize)]
struct CalendarEventInput {
    title: String,
    #[serde(default)]
    #[allow(dead_code)]
    description: Option<String>,
    date: String,
    #[serde(default)]
    #[allow(dead_code)]
    time: Option<String>,
    #[serde(default)]
    #[allow(dead_code)]
    duration_minutes: Option<u32>,
}

/// Creates a new event in the user's calendar.
///
/// Simulated: the action is logged and a confirmation string returned.
pub struct AddCalendarEventTool;

#[async_trait::async_trait]
impl AssistantTool for AddCalendarEventTool {
    fn name(&self) -> &str {
        "add_calendar_event"
    }

    fn description(&self) -> &str {
        "Creates a new event in the user's calendar."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "title": {
                    "type": "string",
                    "description": "The title of the calendar event."
                },
                "description": {
                    "type": "string",
                    "description": "A brief description of the event."
                },
                "date": {
                    "type": "string",
                    "description": "The date of the event (e.g., \"YYYY-MM-DD\")."
                },
                "time": {
                    "type": "string",
                    "description": "The time of the event (e.g., \"HH:MM\")."
                },
                "duration_minutes": {
                    "type": "integer",
                    "description": "The duration of the event in minutes."
                }
            },
            "required": ["title", "date"]
        })
    }

    async fn execute(&self, input: Value) -> ChalkboardResult<Value> {
        let event: CalendarEventInput = typed_input(self.name(), input)?;
        info!(title = %event.title, date = %event.date, "Simulating calendar event creation");

        Ok(Value::String(format!(
            "Successfully scheduled the event: \"{}\" on {}.",
            event.title, event.date
        )))
    }
}
