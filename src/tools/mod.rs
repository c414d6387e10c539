// ABOUTME: Built-in tools the chat agent ships with.
// ABOUTME: Arithmetic evaluation and simulated weather lookup.

mod calculator;
mod weather;

pub use calculator::{calculate, CalculatorTool};
pub use weather::WeatherTool;
