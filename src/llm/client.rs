// ABOUTME: Defines the CompletionClient trait - the abstraction layer that
// ABOUTME: lets the agent loop work with any completion backend.

use async_trait::async_trait;

use super::{Completion, Transcript};
use crate::error::LlmError;

/// Trait for completion-service client implementations.
///
/// One call, one response; no streaming. Failures propagate to the
/// caller as hard errors - the agent loop does not retry them.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Request a completion for the given transcript.
    async fn complete(&self, transcript: &Transcript) -> Result<Completion, LlmError>;
}
