//! Email tool.

use crate::registry::AssistantTool;
use crate::tools::typed_input;
use chalkboard_error::ChalkboardResult;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::info;

/// Typed input for [`SendEmailTool`].
#[derive(Debug, Deserialize)]
struct SendEmailInput {
    recipient: String,
    subject: String,
    #[allow(dead_code)]
    body: String,
}

/// Sends an email to a specified recipient.
///
/// Simulated: the action is logged and a confirmation string returned.
pub struct SendEmailTool;

#[async_trait::async_trait]
impl AssistantTool for SendEmailTool {
    fn name(&self) -> &str {
        "send_email"
    }

    fn description(&self) -> &str {
        "Sends an email to a specified recipient."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "recipient": {
                    "type": "string",
                    "description": "The email address of the recipient."
                },
                "subject": {
                    "type": "string",
                    "description": "The subject line of the email."
                },
                "body": {
                    "type": "string",
                    "description": "The content of the email."
                }
            },
            "required": ["recipient", "subject", "body"]
        })
    }

    async fn execute(&self, input: Value) -> ChalkboardResult<Value> {
        let email: SendEmailInput = typed_input(self.name(), input)?;
        info!(recipient = %email.recipient, subject = %email.subject, "Simulating email send");

        Ok(Value::String(format!(
            "Successfully sent an email to {} with the subject \"{}\".",
            email.recipient, email.subject
        )))
    }
}
