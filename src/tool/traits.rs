// ABOUTME: Defines the Tool trait - the core abstraction for agent capabilities.
// ABOUTME: Tools have a name, description, and async string-to-string invoke.

use async_trait::async_trait;

/// A tool that can be invoked by the agent on behalf of the model.
///
/// The contract is deliberately narrow: one string in, one string out.
/// Errors returned here never cross the registry boundary as errors;
/// they are rendered into model-visible error strings.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Returns the unique name of this tool.
    fn name(&self) -> &str;

    /// Returns a human-readable description for the model.
    fn description(&self) -> &str;

    /// Invoke the tool with the given input.
    async fn invoke(&self, input: &str) -> Result<String, anyhow::Error>;
}
