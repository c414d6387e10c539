// ABOUTME: Agent module - the JSON action protocol and the bounded tool loop.
// ABOUTME: Orchestrates the completion client and tool registry per query.

mod action;
mod prompt;
mod runner;

pub use action::{Action, ProtocolViolation};
pub use prompt::system_prompt;
pub use runner::{AgentResult, ToolAgent, DEFAULT_MAX_STEPS, EXHAUSTED_MESSAGE};
