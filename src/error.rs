// ABOUTME: Defines all error types for the toolloop library using thiserror.
// ABOUTME: Each submodule has its own error enum, unified under ToolloopError.

/// Top-level error type for the toolloop library.
#[derive(Debug, thiserror::Error)]
pub enum ToolloopError {
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("Tool error: {0}")]
    Tool(#[from] ToolError),
}

/// Errors from completion client operations.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Deserialization error: {0}")]
    Deserialize(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Errors from tool operations.
///
/// Note that the agent loop never sees these directly: the registry's
/// `invoke` wrapper renders every tool failure into an error string that
/// is fed back to the model as an ordinary tool result.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("Tool not found: {0}")]
    NotFound(String),

    #[error("Execution failed: {0}")]
    Execution(#[source] anyhow::Error),
}
