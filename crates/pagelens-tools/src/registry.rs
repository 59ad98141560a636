use crate::tool::{Tool, ToolCall, ToolDefinition, ToolError, ToolResult};
use std::sync::Arc;
use tracing::debug;

/// Ordered collection of tools, looked up by name.
///
/// Registration order is preserved so the definitions handed to an agent
/// are stable between runs.
#[derive(Clone, Default)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from tools whose names are known to be distinct
    pub(crate) fn from_tools(tools: Vec<Arc<dyn Tool>>) -> Self {
        Self { tools }
    }

    /// Register a tool. Returns error if name already registered.
    pub fn register(&mut self, tool: Arc<dyn Tool>) -> Result<(), ToolError> {
        let name = tool.definition().name;
        if self.get(&name).is_some() {
            return Err(ToolError::DuplicateName(name));
        }
        self.tools.push(tool);
        Ok(())
    }

    /// Look up a tool by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools
            .iter()
            .find(|t| t.definition().name == name)
            .cloned()
    }

    /// All tool definitions, in registration order.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(|t| t.definition()).collect()
    }

    /// Tool names, in registration order.
    pub fn names(&self) -> Vec<String> {
        self.tools.iter().map(|t| t.definition().name).collect()
    }

    /// Dispatch a call to the named tool.
    pub async fn call(&self, call: ToolCall) -> Result<ToolResult, ToolError> {
        let tool = self
            .get(&call.name)
            .ok_or_else(|| ToolError::UnknownTool(call.name.clone()))?;

        debug!(tool = %call.name, id = %call.id, "Dispatching tool call");
        let content = tool.execute(call.input).await?;

        Ok(ToolResult {
            tool_call_id: call.id,
            content,
            is_error: false,
        })
    }

    /// Like [`call`](Self::call), but hands malformed input and unknown tool
    /// names back to the agent as an error result. Store and embedding
    /// failures still propagate.
    pub async fn call_for_agent(&self, call: ToolCall) -> Result<ToolResult, ToolError> {
        let id = call.id.clone();
        match self.call(call).await {
            Err(err @ (ToolError::InvalidInput(_) | ToolError::UnknownTool(_))) => {
                debug!(id = %id, error = %err, "Reporting tool error to agent");
                Ok(ToolResult {
                    tool_call_id: id,
                    content: err.to_string(),
                    is_error: true,
                })
            }
            other => other,
        }
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}
