// ABOUTME: ToolAgent - the bounded JSON-protocol tool-calling loop.
// ABOUTME: Alternates completion calls and tool dispatch until a final answer
// ABOUTME: arrives or the step budget runs out.

use std::sync::Arc;

use tracing::{debug, warn};

use super::action::{Action, ProtocolViolation};
use super::prompt::system_prompt;
use crate::error::LlmError;
use crate::llm::{CompletionClient, Transcript, Usage};
use crate::tool::Registry;

/// Default step budget for one run.
pub const DEFAULT_MAX_STEPS: usize = 5;

/// Answer returned when the step budget runs out. Budget exhaustion is a
/// defined terminal outcome, not an error.
pub const EXHAUSTED_MESSAGE: &str = "Agent exceeded max tool-steps.";

const NOT_JSON_REMINDER: &str =
    "Your previous reply violated the JSON-only rule. Respond ONLY in valid JSON.";
const UNKNOWN_ACTION_REMINDER: &str =
    "Invalid action. Respond ONLY using the specified JSON format.";
const TOOL_RESULT_REPROMPT: &str =
    "Use the tool result to continue and output the final answer in JSON.";

/// Result of one agent run.
#[derive(Debug, Clone)]
pub struct AgentResult {
    /// Final answer text, or [`EXHAUSTED_MESSAGE`] if the budget ran out.
    pub answer: String,

    /// Number of completion calls made.
    pub steps: usize,

    /// Number of tool invocations made.
    pub tool_calls: usize,

    /// Total token usage across all completion calls.
    pub usage: Usage,
}

/// A conversational agent that may invoke registered tools.
///
/// The model is untrusted to follow the JSON format, so every parse or
/// validation failure re-prompts within the same loop instead of
/// aborting; `max_steps` bounds the loop to guarantee termination.
pub struct ToolAgent {
    client: Arc<dyn CompletionClient>,
    tools: Registry,
    max_steps: usize,
}

impl ToolAgent {
    /// Create an agent over a completion client and a tool registry.
    pub fn new(client: Arc<dyn CompletionClient>, tools: Registry) -> Self {
        Self {
            client,
            tools,
            max_steps: DEFAULT_MAX_STEPS,
        }
    }

    /// Override the step budget.
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// The configured step budget.
    pub fn max_steps(&self) -> usize {
        self.max_steps
    }

    /// Run the loop for one user query.
    ///
    /// Each run owns a fresh transcript; nothing is shared across runs.
    /// Tool failures are fed back to the model as error strings, while
    /// completion-service failures abort the run with `Err`.
    pub async fn run(&self, user_input: &str) -> Result<AgentResult, LlmError> {
        let mut transcript = Transcript::new(system_prompt(&self.tools));
        transcript.push_user(user_input);

        let mut usage = Usage::default();
        let mut tool_calls = 0;

        for step in 0..self.max_steps {
            let completion = self.client.complete(&transcript).await?;
            usage.input_tokens += completion.usage.input_tokens;
            usage.output_tokens += completion.usage.output_tokens;

            let raw = completion.text.trim();
            debug!(step, raw, "completion received");

            match Action::parse(raw) {
                Action::FinalAnswer { answer } => {
                    debug!(step, "final answer");
                    return Ok(AgentResult {
                        answer,
                        steps: step + 1,
                        tool_calls,
                        usage,
                    });
                }
                Action::CallTool { tool, input } => {
                    debug!(step, %tool, %input, "tool call requested");
                    tool_calls += 1;

                    let result = self.tools.invoke(&tool, &input).await;
                    transcript.push_assistant(format!("[TOOL_RESULT] {}", result));
                    transcript.push_user(TOOL_RESULT_REPROMPT);
                }
                Action::Invalid(ProtocolViolation::NotJson) => {
                    warn!(step, "reply was not valid JSON, re-prompting");
                    transcript.push_assistant(NOT_JSON_REMINDER);
                }
                Action::Invalid(ProtocolViolation::UnknownAction) => {
                    warn!(step, "reply had no recognized action, re-prompting");
                    transcript.push_assistant(UNKNOWN_ACTION_REMINDER);
                }
            }
        }

        warn!(max_steps = self.max_steps, "step budget exhausted");
        Ok(AgentResult {
            answer: EXHAUSTED_MESSAGE.to_string(),
            steps: self.max_steps,
            tool_calls,
            usage,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use super::*;
    use crate::llm::{Completion, Role};
    use crate::tool::Tool;
    use crate::tools::CalculatorTool;

    /// A completion client that replays a canned script and records every
    /// transcript it was called with.
    struct ScriptedClient {
        responses: Mutex<VecDeque<String>>,
        seen: Mutex<Vec<Transcript>>,
    }

    impl ScriptedClient {
        fn new(responses: &[&str]) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(responses.iter().map(|s| s.to_string()).collect()),
                seen: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> usize {
            self.seen.lock().unwrap().len()
        }

        fn transcript(&self, call: usize) -> Transcript {
            self.seen.lock().unwrap()[call].clone()
        }
    }

    #[async_trait::async_trait]
    impl CompletionClient for ScriptedClient {
        async fn complete(&self, transcript: &Transcript) -> Result<Completion, LlmError> {
            self.seen.lock().unwrap().push(transcript.clone());
            let text = self.responses.lock().unwrap().pop_front().ok_or_else(|| {
                LlmError::Api {
                    status: 500,
                    message: "script exhausted".to_string(),
                }
            })?;
            Ok(Completion::text(text))
        }
    }

    fn agent_with(client: Arc<ScriptedClient>) -> ToolAgent {
        let tools = Registry::builder().tool(CalculatorTool).build();
        ToolAgent::new(client, tools)
    }

    #[tokio::test]
    async fn test_direct_final_answer() {
        let client = ScriptedClient::new(&[r#"{"action":"final_answer","answer":"hi"}"#]);
        let result = agent_with(client.clone()).run("hello").await.unwrap();

        assert_eq!(result.answer, "hi");
        assert_eq!(result.steps, 1);
        assert_eq!(result.tool_calls, 0);
        assert_eq!(client.calls(), 1);
    }

    #[tokio::test]
    async fn test_transcript_shape() {
        let client = ScriptedClient::new(&[r#"{"action":"final_answer","answer":"ok"}"#]);
        agent_with(client.clone()).run("What is 2+2?").await.unwrap();

        let sent = client.transcript(0);
        assert_eq!(sent.messages()[0].role, Role::System);
        assert_eq!(sent.messages()[1].role, Role::User);
        assert_eq!(sent.messages()[1].content, "What is 2+2?");
    }

    #[tokio::test]
    async fn test_malformed_replies_within_budget() {
        let client = ScriptedClient::new(&[
            "I think the answer is 4.",
            "still not json",
            r#"{"action":"final_answer","answer":"4"}"#,
        ]);
        let result = agent_with(client.clone()).run("2+2?").await.unwrap();

        assert_eq!(result.answer, "4");
        assert_eq!(result.steps, 3);
        assert_eq!(client.calls(), 3);

        // The re-prompt reminder must have entered the transcript.
        let second = client.transcript(1);
        assert_eq!(
            second.messages().last().unwrap().content,
            NOT_JSON_REMINDER
        );
    }

    #[tokio::test]
    async fn test_malformed_replies_exhaust_budget() {
        // Valid answer arrives on call 6, one past the default budget of 5.
        let client = ScriptedClient::new(&[
            "a",
            "b",
            "c",
            "d",
            "e",
            r#"{"action":"final_answer","answer":"too late"}"#,
        ]);
        let result = agent_with(client.clone()).run("2+2?").await.unwrap();

        assert_eq!(result.answer, EXHAUSTED_MESSAGE);
        assert_eq!(result.steps, 5);
        assert_eq!(client.calls(), 5);
    }

    #[tokio::test]
    async fn test_single_malformed_reply_with_budget_of_one() {
        let client = ScriptedClient::new(&["not json"]);
        let agent = agent_with(client.clone()).with_max_steps(1);

        let result = agent.run("2+2?").await.unwrap();
        assert_eq!(result.answer, EXHAUSTED_MESSAGE);
        assert_eq!(client.calls(), 1);
    }

    #[tokio::test]
    async fn test_unknown_action_reminder() {
        let client = ScriptedClient::new(&[
            r#"{"action":"dance"}"#,
            r#"{"action":"final_answer","answer":"done"}"#,
        ]);
        let result = agent_with(client.clone()).run("hi").await.unwrap();

        assert_eq!(result.answer, "done");
        let second = client.transcript(1);
        assert_eq!(
            second.messages().last().unwrap().content,
            UNKNOWN_ACTION_REMINDER
        );
    }

    #[tokio::test]
    async fn test_unknown_tool_never_terminates_the_loop() {
        let client = ScriptedClient::new(&[
            r#"{"action":"call_tool","tool":"browser","input":"example.com"}"#,
            r#"{"action":"final_answer","answer":"no browser here"}"#,
        ]);
        let result = agent_with(client.clone()).run("look it up").await.unwrap();

        assert_eq!(result.answer, "no browser here");
        assert_eq!(result.tool_calls, 1);

        let second = client.transcript(1);
        let messages = second.messages();
        let n = messages.len();
        assert_eq!(
            messages[n - 2].content,
            "[TOOL_RESULT] [Tool error] Unknown tool: browser"
        );
        assert_eq!(messages[n - 1].content, TOOL_RESULT_REPROMPT);
    }

    #[tokio::test]
    async fn test_calculator_round_trip() {
        let client = ScriptedClient::new(&[
            r#"{"action":"call_tool","tool":"calculator","input":"3*4"}"#,
            r#"{"action":"final_answer","answer":"12"}"#,
        ]);
        let result = agent_with(client.clone()).run("what is 3 times 4").await.unwrap();

        assert_eq!(result.answer, "12");
        assert_eq!(result.steps, 2);
        assert_eq!(client.calls(), 2);

        let second = client.transcript(1);
        let messages = second.messages();
        assert_eq!(messages[messages.len() - 2].content, "[TOOL_RESULT] 12");
    }

    #[tokio::test]
    async fn test_failing_tool_feeds_error_string_back() {
        struct FaultyTool;

        #[async_trait::async_trait]
        impl Tool for FaultyTool {
            fn name(&self) -> &str {
                "faulty"
            }
            fn description(&self) -> &str {
                "Always fails"
            }
            async fn invoke(&self, _input: &str) -> Result<String, anyhow::Error> {
                Err(anyhow::anyhow!("disk on fire"))
            }
        }

        let client = ScriptedClient::new(&[
            r#"{"action":"call_tool","tool":"faulty","input":""}"#,
            r#"{"action":"final_answer","answer":"recovered"}"#,
        ]);
        let tools = Registry::builder().tool(FaultyTool).build();
        let agent = ToolAgent::new(client.clone(), tools);

        let result = agent.run("try it").await.unwrap();
        assert_eq!(result.answer, "recovered");

        let second = client.transcript(1);
        let messages = second.messages();
        assert_eq!(
            messages[messages.len() - 2].content,
            "[TOOL_RESULT] [Tool error] disk on fire"
        );
    }

    #[tokio::test]
    async fn test_completion_failure_propagates() {
        let client = ScriptedClient::new(&[]);
        let err = agent_with(client).run("hi").await.unwrap_err();
        assert!(matches!(err, LlmError::Api { status: 500, .. }));
    }
}
