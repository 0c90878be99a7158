//! Research agent flow.
//!
//! Gathers information through the web-search tool, then synthesizes a
//! structured report with its sources.

use crate::registry::ToolRegistry;
use chalkboard_core::{GenerateRequest, Message, Output, Role};
use chalkboard_error::{
    ChalkboardResult, FlowError, FlowErrorKind, SchemaError, SchemaErrorKind,
};
use chalkboard_interface::{JsonMode, ToolUse};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, instrument};

/// Caller input for the research agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResearchRequest {
    /// The topic to research
    pub topic: String,
}

impl ResearchRequest {
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

/// A source consulted for the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResearchSource {
    /// The title of the source
    pub title: String,
    /// The URL of the source
    pub url: String,
}

/// A structured research report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResearchReport {
    /// The report in Markdown format
    pub report: String,
    /// The sources used for the report
    pub sources: Vec<ResearchSource>,
}

fn report_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "report": { "type": "string" },
            "sources": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "title": { "type": "string" },
                        "url": { "type": "string" }
                    },
                    "required": ["title", "url"]
                }
            }
        },
        "required": ["report", "sources"]
    })
}

/// Research a topic and produce a structured report with sources.
///
/// A first model call with the search tool attached decides the query; the
/// tool's results are fed into a second, structured call producing the
/// report. If the model answers without searching, its text becomes the
/// report with no sources.
#[instrument(skip(driver, registry, request), fields(topic = %request.topic))]
pub async fn run_research<D>(
    driver: &D,
    registry: &ToolRegistry,
    request: &ResearchRequest,
) -> ChalkboardResult<ResearchReport>
where
    D: ToolUse + JsonMode + ?Sized,
{
    request.validate()?;

    let prompt = format!(
        "Please provide a detailed research report on the topic: \"{}\".\n\n\
         Your task is to:\n\
         1.  Use the web search tool to find relevant information on the topic.\n\
         2.  Synthesize the information from the search results into a comprehensive report.\n\
         3.  The report should be well-structured, easy to read, and formatted in Markdown. \
         It should include sections like Introduction, Key Concepts, and Conclusion.\n\
         4.  Extract the titles and URLs from the search results you used and include them \
         in the 'sources' field of the final output.",
        request.topic,
    );

    let mut messages = vec![Message::text(Role::User, prompt)];
    let first_request = GenerateRequest {
        messages: messages.clone(),
        ..Default::default()
    };
    let first_response = driver
        .generate_with_tools(&first_request, &registry.definitions())
        .await?;

    let requested_call = first_response.outputs.iter().find_map(|output| match output {
        Output::ToolCalls(calls) => calls.first().cloned(),
        _ => None,
    });

    let Some(call) = requested_call else {
        info!("Model answered without searching");
        return Ok(ResearchReport {
            report: first_response.text(),
            sources: Vec::new(),
        });
    };

    let search_results = registry
        .execute(&call.name, call.arguments.clone())
        .await
        .map_err(|e| {
            FlowError::new(FlowErrorKind::ToolFailed {
                tool: call.name.clone(),
                message: e.to_string(),
            })
        })?;

    messages.push(Message::text(
        Role::Assistant,
        format!("Calling tool '{}' with {}", call.name, call.arguments),
    ));
    messages.push(Message::text(
        Role::User,
        format!(
            "Here are the search results:\n{}\n\nNow produce the structured report with \
             its sources.",
            search_results
        ),
    ));

    let second_request = GenerateRequest {
        messages,
        ..Default::default()
    };
    let value = driver.generate_json(&second_request, &report_schema()).await?;

    serde_json::from_value(value).map_err(|e| {
        FlowError::new(FlowErrorKind::MissingStructuredOutput {
            stage: "research",
            message: e.to_string(),
        })
        .into()
    })
}
