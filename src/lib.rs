// ABOUTME: Root module for toolloop - a minimal JSON tool-calling agent library.
// ABOUTME: Re-exports all public types from submodules.

pub mod agent;
pub mod error;
pub mod llm;
pub mod prelude;
pub mod tool;
pub mod tools;

pub use error::ToolloopError;
