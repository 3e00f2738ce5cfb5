//! Run-level types: configuration, input, results, and step records.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::chat::ChatResponse;
use crate::error::{Error, Result};
use crate::message::{Message, Role, ToolCall};
use crate::usage::Usage;

/// Per-run configuration overriding agent defaults.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunConfig {
    /// Overrides [`Agent::max_steps`](super::Agent::max_steps) for this run.
    pub max_steps: Option<usize>,
}

impl RunConfig {
    /// Create a default run configuration.
    #[must_use]
    pub const fn new() -> Self {
        Self { max_steps: None }
    }

    /// Set the step limit for this run.
    #[must_use]
    pub const fn max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = Some(max_steps);
        self
    }
}

/// The initial messages of a run, placed after the system instructions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserInput {
    messages: Vec<Message>,
}

impl UserInput {
    /// Consume the input, returning its messages.
    #[must_use]
    pub fn into_messages(self) -> Vec<Message> {
        self.messages
    }
}

impl From<&str> for UserInput {
    fn from(text: &str) -> Self {
        Self {
            messages: vec![Message::user(text)],
        }
    }
}

impl From<String> for UserInput {
    fn from(text: String) -> Self {
        Self {
            messages: vec![Message::user(text)],
        }
    }
}

impl From<Message> for UserInput {
    fn from(message: Message) -> Self {
        Self {
            messages: vec![message],
        }
    }
}

impl From<Vec<Message>> for UserInput {
    fn from(messages: Vec<Message>) -> Self {
        Self { messages }
    }
}

/// A tool call the model asked for, with arguments decoded.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolCallRequest {
    /// Provider-assigned call identifier.
    pub id: String,
    /// Name of the requested tool.
    pub name: String,
    /// Decoded arguments. Undecodable argument text is kept as a JSON string
    /// so the tool reports the parse failure itself.
    pub arguments: Value,
}

impl From<&ToolCall> for ToolCallRequest {
    fn from(call: &ToolCall) -> Self {
        Self {
            id: call.id.clone(),
            name: call.function.name.clone(),
            arguments: call
                .arguments_value()
                .unwrap_or_else(|_| Value::String(call.function.arguments.clone())),
        }
    }
}

/// What the runner does after classifying a model response.
#[derive(Debug, Clone, PartialEq)]
pub enum NextStep {
    /// Execute these tool calls and ask the model again.
    ToolCalls {
        /// Calls in the order the model issued them.
        calls: Vec<ToolCallRequest>,
    },
    /// The run is finished with this output.
    FinalOutput {
        /// The final answer; a JSON document for structured agents.
        output: Value,
    },
}

/// Record of one executed tool call.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolCallRecord {
    /// Call identifier.
    pub id: String,
    /// Tool name.
    pub name: String,
    /// Arguments passed to the tool.
    pub arguments: Value,
    /// Text sent back to the model.
    pub result: String,
    /// Whether the tool succeeded.
    pub success: bool,
}

/// One model turn and the tool calls it triggered.
#[derive(Debug, Clone)]
pub struct StepInfo {
    /// 1-based step number.
    pub step: usize,
    /// The model response for this step.
    pub response: ChatResponse,
    /// Tool calls executed in response, in call order.
    pub tool_calls: Vec<ToolCallRecord>,
}

/// The outcome of a completed agent run.
#[derive(Debug, Clone)]
pub struct RunResult {
    /// Final output. Plain agents get a JSON string, structured agents the
    /// decoded JSON document.
    pub output: Value,
    /// Full transcript: system, user, assistant and tool messages in order.
    pub messages: Vec<Message>,
    /// Per-step history.
    pub step_history: Vec<StepInfo>,
    /// Token usage summed over every model call.
    pub usage: Usage,
    /// Number of model turns taken.
    pub steps: usize,
    /// Name of the agent that produced this result.
    pub agent_name: String,
    /// Name of the declared output schema, if any.
    pub output_schema: Option<String>,
}

impl RunResult {
    /// Returns the output as text when it is a JSON string.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.output.as_str()
    }

    /// Deserialize the output into `T`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StructuredOutput`] if the output does not match `T`.
    pub fn parse<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_value(self.output.clone()).map_err(|e| {
            Error::structured_output(
                self.output_schema.as_deref().unwrap_or("output"),
                e.to_string(),
            )
        })
    }

    /// Iterate over every executed tool call across all steps.
    pub fn tool_calls(&self) -> impl Iterator<Item = &ToolCallRecord> {
        self.step_history.iter().flat_map(|s| s.tool_calls.iter())
    }

    /// Iterate over the tool result messages of the transcript.
    pub fn tool_messages(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter().filter(|m| m.role == Role::Tool)
    }
}

/// A typed structured answer together with the run that produced it.
#[derive(Debug, Clone)]
pub struct StructuredResult<T> {
    /// The decoded record.
    pub value: T,
    /// The underlying run.
    pub run: RunResult,
}
