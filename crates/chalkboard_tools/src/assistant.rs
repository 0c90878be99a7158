//! Tool-using assistant router.

use crate::registry::ToolRegistry;
use chalkboard_core::{GenerateRequest, Input, MediaSource, Message, Output, Role, decode_data_uri};
use chalkboard_error::{ChalkboardResult, FlowError, FlowErrorKind, SchemaError, SchemaErrorKind};
use chalkboard_interface::{Driver, ToolUse};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

const SYSTEM_PROMPT: &str = "You are a helpful teacher's assistant.\n\
    When asked to perform an action, use the available tools.\n\
    If a tool is used, summarize the result of the tool call in your response.\n\
    If you don't have a tool for the request, simply respond as a helpful AI assistant.";

/// Caller input for an assistant turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssistantRequest {
    /// The user's request or question
    pub query: String,
    /// Optional image attached to the query, as a data URI
    pub image: Option<String>,
    /// Prior conversation turns
    #[serde(default)]
    pub history: Vec<Message>,
}

impl AssistantRequest {
    /// Validate the request against its declared schema.
    pub fn validate(&self) -> ChalkboardResult<()> {
        if self.query.trim().is_empty() {
            return Err(SchemaError::new(SchemaErrorKind::TooShort {
                field: "query",
                min: 1,
            })
            .into());
        }
        if let Some(image) = &self.image
            && let Err(e) = decode_data_uri(image)
        {
            return Err(SchemaError::new(SchemaErrorKind::InvalidDataUri {
                field: "image",
                reason: e.to_string(),
            })
            .into());
        }
        Ok(())
    }
}

/// The assistant's answer for one turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssistantResponse {
    /// The assistant's response, summarizing any action taken
    pub response: String,
    /// The tool executed this turn, if any
    pub tool_used: Option<String>,
}

/// Run one assistant turn.
///
/// Issues a single model call with the registry's tool definitions
/// attached. If the model requests a tool, exactly one handler (the first
/// requested call) executes, and a second model call over the tool's raw
/// output produces the final text. Otherwise the first call's text is
/// returned directly.
///
/// # Errors
///
/// - Validation errors on malformed input, before any remote call
/// - A tool handler failure, surfaced as a single assistant error
#[instrument(skip(driver, registry, request), fields(query_len = request.query.len()))]
pub async fn run_assistant<D>(
    driver: &D,
    registry: &ToolRegistry,
    request: &AssistantRequest,
) -> ChalkboardResult<AssistantResponse>
where
    D: ToolUse + ?Sized,
{
    request.validate()?;

    let mut messages = vec![Message::text(Role::System, SYSTEM_PROMPT)];
    messages.extend(request.history.iter().cloned());

    let mut user_content = vec![Input::Text(request.query.clone())];
    if let Some(image) = &request.image {
        let (mime, data) = decode_data_uri(image)?;
        user_content.push(Input::Image {
            mime: Some(mime),
            source: MediaSource::Binary(data),
        });
    }
    messages.push(Message {
        role: Role::User,
        content: user_content,
    });

    let first_request = GenerateRequest {
        messages: messages.clone(),
        ..Default::default()
    };
    let first_response = driver
        .generate_with_tools(&first_request, &registry.definitions())
        .await?;

    let first_text = first_response.text();
    let requested_call = first_response.outputs.iter().find_map(|output| match output {
        Output::ToolCalls(calls) => calls.first().cloned(),
        _ => None,
    });

    let Some(call) = requested_call else {
        // No tool requested; the first call's text is the answer
        return Ok(AssistantResponse {
            response: first_text,
            tool_used: None,
        });
    };

    info!(tool = %call.name, "Executing requested tool");
    let tool_output = registry
        .execute(&call.name, call.arguments.clone())
        .await
        .map_err(|e| {
            FlowError::new(FlowErrorKind::ToolFailed {
                tool: call.name.clone(),
                message: e.to_string(),
            })
        })?;

    // Feed the tool's raw output back for a user-facing summary
    messages.push(Message::text(
        Role::Assistant,
        format!("Calling tool '{}' with {}", call.name, call.arguments),
    ));
    messages.push(Message::text(
        Role::User,
        format!(
            "The tool '{}' returned:\n{}\n\nSummarize the result of this action for the teacher.",
            call.name, tool_output
        ),
    ));

    let second_request = GenerateRequest {
        messages,
        ..Default::default()
    };
    let second_response = driver.generate(&second_request).await?;

    Ok(AssistantResponse {
        response: second_response.text(),
        tool_used: Some(call.name),
    })
}
