//! Tool registry and tool-using assistant for Chalkboard.
//!
//! Tools are schema-typed functions the model can request as part of
//! producing its answer. The registry dispatches requested calls by name;
//! the assistant router wires one model call with tool definitions to the
//! matching handler and a second model pass over the tool's output.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod assistant;
mod registry;
mod research;
mod tools;

pub use assistant::{AssistantRequest, AssistantResponse, run_assistant};
pub use registry::{AssistantTool, ToolRegistry};
pub use research::{ResearchReport, ResearchRequest, ResearchSource, run_research};
pub use tools::{AddCalendarEventTool, AddKeepNoteTool, SendEmailTool, WebSearchTool};
