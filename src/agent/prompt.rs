// ABOUTME: Renders the strict JSON-only system prompt for the agent loop.
// ABOUTME: The tool list is generated from the registry so prompt and
// ABOUTME: dispatch can never disagree.

use std::fmt::Write;

use crate::tool::Registry;

/// Build the system prompt for a run against the given registry.
pub fn system_prompt(registry: &Registry) -> String {
    let mut tool_list = String::new();
    for (name, description) in registry.descriptions() {
        let _ = writeln!(tool_list, "- {} → {}", name, description);
    }

    format!(
        r#"You are a tool-using agent.

*** RULES YOU MUST FOLLOW ***
1. You MUST ALWAYS respond using ONLY valid JSON.
2. NO markdown. NO text outside JSON. NO explanations.
3. Use EXACTLY one of the following formats:

To call a tool:
{{
  "action": "call_tool",
  "tool": "<tool_name>",
  "input": "<input>"
}}

To return final answer:
{{
  "action": "final_answer",
  "answer": "<your_answer>"
}}

TOOLS AVAILABLE:
{tool_list}
Never invent tools.
Never output anything except valid JSON."#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::{CalculatorTool, WeatherTool};

    #[test]
    fn test_tool_list_is_rendered() {
        let registry = Registry::builder()
            .tool(WeatherTool)
            .tool(CalculatorTool)
            .build();
        let prompt = system_prompt(&registry);

        assert!(prompt.contains("- calculator → Performs safe arithmetic calculations."));
        assert!(prompt.contains("- weather → Returns simulated weather for a location."));
        assert!(prompt.contains("\"action\": \"call_tool\""));
    }
}
