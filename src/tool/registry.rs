// ABOUTME: Implements the Registry - an immutable mapping from tool name to
// ABOUTME: implementation, with an error-string invoke wrapper for the loop.

use std::collections::HashMap;
use std::sync::Arc;

use super::Tool;
use crate::error::ToolError;

/// An immutable registry of tools.
///
/// Built once via [`Registry::builder`] and injected into the agent at
/// construction time; there is no runtime registration.
#[derive(Default)]
pub struct Registry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl Registry {
    /// Start building a registry.
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Get a tool by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// List all tool names, sorted alphabetically.
    pub fn list(&self) -> Vec<String> {
        let mut names: Vec<_> = self.tools.keys().cloned().collect();
        names.sort();
        names
    }

    /// Name and description of every tool, sorted by name.
    pub fn descriptions(&self) -> Vec<(String, String)> {
        let mut entries: Vec<_> = self
            .tools
            .values()
            .map(|t| (t.name().to_string(), t.description().to_string()))
            .collect();
        entries.sort();
        entries
    }

    /// Get the number of registered tools.
    pub fn count(&self) -> usize {
        self.tools.len()
    }

    /// Invoke a tool, surfacing failures as typed errors.
    pub async fn try_invoke(&self, name: &str, input: &str) -> Result<String, ToolError> {
        let tool = self
            .get(name)
            .ok_or_else(|| ToolError::NotFound(name.to_string()))?;
        tool.invoke(input).await.map_err(ToolError::Execution)
    }

    /// Invoke a tool, rendering every failure as a model-visible string.
    ///
    /// The agent loop must keep conversing after a bad tool reference, so
    /// dispatch failure is a recoverable string result, never an error.
    pub async fn invoke(&self, name: &str, input: &str) -> String {
        match self.try_invoke(name, input).await {
            Ok(result) => result,
            Err(ToolError::NotFound(name)) => format!("[Tool error] Unknown tool: {}", name),
            Err(ToolError::Execution(e)) => format!("[Tool error] {}", e),
        }
    }
}

impl Clone for Registry {
    fn clone(&self) -> Self {
        Self {
            tools: self.tools.clone(),
        }
    }
}

/// Builder for [`Registry`].
#[derive(Default)]
pub struct RegistryBuilder {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl RegistryBuilder {
    /// Add a tool.
    pub fn tool<T: Tool + 'static>(self, tool: T) -> Self {
        self.tool_arc(Arc::new(tool))
    }

    /// Add a tool from an Arc.
    pub fn tool_arc(mut self, tool: Arc<dyn Tool>) -> Self {
        self.tools.insert(tool.name().to_string(), tool);
        self
    }

    /// Finish building.
    pub fn build(self) -> Registry {
        Registry { tools: self.tools }
    }
}
