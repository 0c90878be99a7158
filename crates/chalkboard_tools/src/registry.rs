//! Tool trait and registry.

use chalkboard_error::{ChalkboardResult, FlowError, FlowErrorKind};
use chalkboard_interface::ToolDefinition;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// A schema-typed function the model can invoke.
///
/// Each tool declares a JSON Schema for its parameters and deserializes its
/// input into a typed struct before acting. Dispatch happens through the
/// [`ToolRegistry`] by name.
#[async_trait::async_trait]
pub trait AssistantTool: Send + Sync {
    /// Returns the tool name.
    fn name(&self) -> &str;

    /// Returns the tool description for the model.
    fn description(&self) -> &str;

    /// Returns the input schema as JSON Schema.
    fn input_schema(&self) -> Value;

    /// Executes the tool with the given input.
    async fn execute(&self, input: Value) -> ChalkboardResult<Value>;
}

/// Registry for managing assistant tools.
#[derive(Clone)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn AssistantTool>>,
}

impl ToolRegistry {
    /// Creates a new, empty tool registry.
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Registers a tool.
    pub fn register(&mut self, tool: Arc<dyn AssistantTool>) {
        self.tools.insert(tool.name().to_string(), tool);
    }

    /// Gets a tool by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn AssistantTool>> {
        self.tools.get(name).cloned()
    }

    /// Declarations for every registered tool, for attaching to a model call.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools
            .values()
            .map(|tool| ToolDefinition {
                name: tool.name().to_string(),
                description: tool.description().to_string(),
                parameters: tool.input_schema(),
            })
            .collect()
    }

    /// Executes a tool by name.
    ///
    /// # Errors
    ///
    /// Returns an unknown-tool error if no tool with that name is
    /// registered, or the tool's own error if execution fails.
    pub async fn execute(&self, name: &str, input: Value) -> ChalkboardResult<Value> {
        let tool = self
            .get(name)
            .ok_or_else(|| FlowError::new(FlowErrorKind::UnknownTool(name.to_string())))?;

        tool.execute(input).await
    }

    /// Gets the number of registered tools.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Returns true if no tools are registered.
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl Default for ToolRegistry {
    /// A registry with the built-in teacher's-assistant tools.
    fn default() -> Self {
        use crate::tools::{AddCalendarEventTool, AddKeepNoteTool, SendEmailTool, WebSearchTool};

        let mut registry = Self::new();
        registry.register(Arc::new(AddCalendarEventTool));
        registry.register(Arc::new(SendEmailTool));
        registry.register(Arc::new(AddKeepNoteTool));
        registry.register(Arc::new(WebSearchTool));

        tracing::info!(tools = registry.len(), "ToolRegistry initialized");
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn unknown_tool_is_an_error() {
        let registry = ToolRegistry::new();
        let err = registry.execute("no_such_tool", json!({})).await.unwrap_err();
        assert!(err.to_string().contains("no_such_tool"));
    }

    #[tokio::test]
    async fn default_registry_exposes_definitions() {
        let registry = ToolRegistry::default();
        assert_eq!(registry.len(), 4);

        let definitions = registry.definitions();
        assert!(definitions.iter().any(|d| d.name == "send_email"));
        assert!(definitions.iter().all(|d| d.parameters.is_object()));
    }
}
