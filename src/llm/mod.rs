// ABOUTME: LLM module - completion-client abstraction for language model backends.
// ABOUTME: Defines types, the client trait, and the Gemini implementation.

mod client;
mod gemini;
mod types;

pub use client::*;
pub use gemini::*;
pub use types::*;
