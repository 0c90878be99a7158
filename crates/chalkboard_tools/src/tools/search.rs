//! Web search tool.

use crate::registry::AssistantTool;
use crate::tools::typed_input;
use chalkboard_error::ChalkboardResult;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::info;

/// Typed input for [`WebSearchTool`].
#[derive(Debug, Deserialize)]
struct WebSearchInput {
    query: String,
}

/// Performs a web search for the given query.
///
/// Returns a deterministic set of results standing in for a real search
/// API.
pub struct WebSearchTool;

#[async_trait::async_trait]
impl AssistantTool for WebSearchTool {
    fn name(&self) -> &str {
        "web_search"
    }

    fn description(&self) -> &str {
        "Performs a web search for the given query and returns a list of results."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "The search query."
                }
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, input: Value) -> ChalkboardResult<Value> {
        let search: WebSearchInput = typed_input(self.name(), input)?;
        info!(query = %search.query, "Performing canned web search");

        let slug = search.query.to_lowercase().replace(char::is_whitespace, "-");
        let wiki = search.query.replace(char::is_whitespace, "_");

        Ok(json!([
            {
                "title": format!("The Ultimate Guide to {}", search.query),
                "url": format!("https://example.com/guide-to-{}", slug),
                "snippet": format!(
                    "An in-depth article covering all aspects of {}, from its history to \
                     its modern applications. A must-read for anyone interested in the topic.",
                    search.query
                )
            },
            {
                "title": format!("A Beginner's Introduction to {}", search.query),
                "url": format!("https://example.com/intro-to-{}", slug),
                "snippet": format!(
                    "New to {}? This article breaks down the basics in an \
                     easy-to-understand way, with helpful examples and illustrations.",
                    search.query
                )
            },
            {
                "title": format!("{} - Wikipedia", search.query),
                "url": format!("https://en.wikipedia.org/wiki/{}", wiki),
                "snippet": format!(
                    "The official Wikipedia entry for {}, providing a comprehensive \
                     overview, historical context, and links to related subjects.",
                    search.query
                )
            }
        ]))
    }
}
