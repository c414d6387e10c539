// ABOUTME: Tool module - defines the tool trait and the immutable registry.
// ABOUTME: Core abstraction for agent capabilities.

mod registry;
mod traits;

pub use registry::*;
pub use traits::*;
