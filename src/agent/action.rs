// ABOUTME: Decodes one completion response into an Action via a tagged schema.
// ABOUTME: Unparseable or unrecognized replies map to Invalid, never to errors.

use serde::Deserialize;

/// The wire format the model is instructed to emit.
#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
enum Wire {
    FinalAnswer {
        #[serde(default)]
        answer: String,
    },
    CallTool {
        #[serde(default)]
        tool: String,
        #[serde(default)]
        input: String,
    },
}

/// How a reply failed the JSON action protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolViolation {
    /// The reply was not valid JSON at all.
    NotJson,
    /// The reply was JSON, but the `action` field was missing or unrecognized.
    UnknownAction,
}

/// The decoded intent of one completion response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    FinalAnswer { answer: String },
    CallTool { tool: String, input: String },
    Invalid(ProtocolViolation),
}

impl Action {
    /// Decode a raw completion response.
    ///
    /// This is total: the model is untrusted to follow the format, so
    /// every failure becomes an `Invalid` variant the loop can re-prompt
    /// on instead of an error.
    pub fn parse(raw: &str) -> Self {
        match serde_json::from_str::<Wire>(raw) {
            Ok(Wire::FinalAnswer { answer }) => Action::FinalAnswer { answer },
            Ok(Wire::CallTool { tool, input }) => Action::CallTool { tool, input },
            Err(_) => {
                if serde_json::from_str::<serde_json::Value>(raw).is_ok() {
                    Action::Invalid(ProtocolViolation::UnknownAction)
                } else {
                    Action::Invalid(ProtocolViolation::NotJson)
                }
            }
        }
    }
}
