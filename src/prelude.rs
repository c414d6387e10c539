// ABOUTME: Prelude module - convenient imports for common use cases.
// ABOUTME: Use `use toolloop::prelude::*;` to get started quickly.

pub use crate::agent::{
    Action, AgentResult, ProtocolViolation, ToolAgent, DEFAULT_MAX_STEPS, EXHAUSTED_MESSAGE,
};
pub use crate::error::{LlmError, ToolError, ToolloopError};
pub use crate::llm::{
    ChatMessage, Completion, CompletionClient, GeminiClient, Role, Transcript, Usage,
};
pub use crate::tool::{Registry, RegistryBuilder, Tool};
pub use crate::tools::{calculate, CalculatorTool, WeatherTool};
