//! Provider-neutral chat exchange.
//!
//! The runner builds a [`ChatRequest`] per step and hands it to a
//! [`ChatProvider`]; each backend translates it to its own wire format and
//! returns a [`ChatResponse`].

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;
use crate::message::{Message, ToolCall};
use crate::tool::ToolDefinition;
use crate::usage::Usage;

/// One model turn to be sent to a provider.
#[derive(Debug, Clone, Default)]
pub struct ChatRequest {
    /// Model id, e.g. `gpt-4o` or `claude-sonnet-4-5-20250929`.
    pub model: String,
    /// Transcript so far.
    pub messages: Vec<Message>,
    /// Output token cap. Providers that need one fall back to their default.
    pub max_tokens: Option<u32>,
    /// Sampling temperature.
    pub temperature: Option<f32>,
    /// Tools offered this turn. `None` when there are none.
    pub tools: Option<Vec<ToolDefinition>>,
    /// Only sent when `tools` is set.
    pub tool_choice: Option<ToolChoice>,
    /// Schema the reply text must follow.
    pub response_format: Option<ResponseFormat>,
}

impl ChatRequest {
    /// An empty request for `model`.
    #[must_use]
    pub fn new(model: impl Into<String>) -> Self {
        Self::with_messages(model, Vec::new())
    }

    /// A request for `model` carrying `messages`.
    #[must_use]
    pub fn with_messages(model: impl Into<String>, messages: Vec<Message>) -> Self {
        Self {
            model: model.into(),
            messages,
            ..Default::default()
        }
    }

    /// Append a system message.
    #[must_use]
    pub fn system(mut self, content: impl Into<String>) -> Self {
        self.messages.push(Message::system(content));
        self
    }

    /// Append a user message.
    #[must_use]
    pub fn user(mut self, content: impl Into<String>) -> Self {
        self.messages.push(Message::user(content));
        self
    }

    /// Cap the output tokens.
    #[must_use]
    pub const fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Set the sampling temperature.
    #[must_use]
    pub const fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Offer `tools`. An empty list offers none.
    #[must_use]
    pub fn tools(mut self, tools: Vec<ToolDefinition>) -> Self {
        self.tools = (!tools.is_empty()).then_some(tools);
        self
    }

    /// Constrain how the model may use the offered tools.
    #[must_use]
    pub const fn tool_choice(mut self, choice: ToolChoice) -> Self {
        self.tool_choice = Some(choice);
        self
    }

    /// Require the reply text to follow a JSON schema.
    #[must_use]
    pub fn response_format(mut self, format: ResponseFormat) -> Self {
        self.response_format = Some(format);
        self
    }
}

/// Whether the model must call a tool this turn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ToolChoice {
    /// The model may answer in text or call tools.
    #[default]
    Auto,
    /// The model must call at least one tool.
    Required,
}

/// A JSON schema the reply text must conform to.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseFormat {
    /// Schema name reported to the provider.
    pub name: String,
    /// The JSON schema.
    pub schema: Value,
    /// Ask the provider to enforce the schema exactly.
    pub strict: bool,
}

impl ResponseFormat {
    /// A strict format for `schema`.
    #[must_use]
    pub fn json_schema(name: impl Into<String>, schema: Value) -> Self {
        Self {
            name: name.into(),
            schema,
            strict: true,
        }
    }
}

/// Schema name and JSON schema for `T`, without the `$schema` marker.
#[must_use]
pub fn generate_json_schema<T: schemars::JsonSchema>() -> (String, Value) {
    let mut schema = schemars::schema_for!(T).to_value();
    if let Value::Object(ref mut map) = schema {
        map.remove("$schema");
    }
    (T::schema_name().into_owned(), schema)
}

/// Why the model stopped producing output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[non_exhaustive]
pub enum StopReason {
    /// It finished its turn.
    #[default]
    Stop,
    /// It hit the output token cap.
    Length,
    /// It is waiting for tool results.
    ToolCalls,
    /// Output was withheld by the provider.
    ContentFilter,
}

impl StopReason {
    /// Map an OpenAI `finish_reason` or Anthropic `stop_reason`.
    /// Unrecognised values count as [`StopReason::Stop`].
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "length" | "max_tokens" => Self::Length,
            "tool_calls" | "tool_use" | "function_call" => Self::ToolCalls,
            "content_filter" | "refusal" => Self::ContentFilter,
            _ => Self::Stop,
        }
    }

    /// Whether the output was cut off by the token cap.
    #[must_use]
    pub const fn is_truncated(self) -> bool {
        matches!(self, Self::Length)
    }
}

/// The model's reply to one [`ChatRequest`].
#[derive(Debug, Clone)]
pub struct ChatResponse {
    /// The assistant message.
    pub message: Message,
    /// Why generation ended.
    pub stop_reason: StopReason,
    /// Tokens billed for this turn.
    pub usage: Option<Usage>,
    /// Model that answered, as reported by the provider.
    pub model: Option<String>,
    /// Provider's id for the reply.
    pub id: Option<String>,
}

impl ChatResponse {
    /// Wrap an assistant message.
    #[must_use]
    pub const fn new(message: Message) -> Self {
        Self {
            message,
            stop_reason: StopReason::Stop,
            usage: None,
            model: None,
            id: None,
        }
    }

    /// A plain text reply.
    #[must_use]
    pub fn from_text(content: impl Into<String>) -> Self {
        Self::new(Message::assistant(content))
    }

    /// A reply requesting `tool_calls`.
    #[must_use]
    pub fn from_tool_calls(tool_calls: Vec<ToolCall>) -> Self {
        Self::new(Message::assistant_tool_calls(tool_calls)).with_stop_reason(StopReason::ToolCalls)
    }

    /// Set the stop reason.
    #[must_use]
    pub const fn with_stop_reason(mut self, reason: StopReason) -> Self {
        self.stop_reason = reason;
        self
    }

    /// Set token usage.
    #[must_use]
    pub const fn with_usage(mut self, usage: Usage) -> Self {
        self.usage = Some(usage);
        self
    }

    /// Set the answering model.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set the provider's reply id.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Text of the reply, if any.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.message.text()
    }

    /// Tool calls requested by the reply, if any.
    #[must_use]
    pub fn tool_calls(&self) -> Option<&[ToolCall]> {
        self.message.tool_calls.as_deref()
    }
}

/// A chat backend. The runner only talks to `dyn ChatProvider`.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Send one request and wait for the full reply.
    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse>;

    /// Short provider name for logs and errors.
    fn provider_name(&self) -> &'static str;

    /// Model used when the agent does not name one.
    fn default_model(&self) -> &str;

    /// Whether the provider can enforce a [`ResponseFormat`] natively.
    fn supports_json_mode(&self) -> bool {
        false
    }
}

/// A provider shared between agents.
pub type SharedChatProvider = Arc<dyn ChatProvider>;

#[cfg(test)]
mod tests {
    use super::*;
    use schemars::JsonSchema;

    #[derive(JsonSchema)]
    #[allow(dead_code)]
    struct Country {
        name: String,
        capital: String,
    }

    #[test]
    fn builder_collects_messages() {
        let req = ChatRequest::new("gpt-4o")
            .system("You are helpful")
            .user("Hi")
            .max_tokens(64)
            .temperature(0.0);
        assert_eq!(req.model, "gpt-4o");
        assert_eq!(req.messages.len(), 2);
        assert_eq!(req.messages[0].role.as_str(), "system");
        assert_eq!(req.max_tokens, Some(64));
        assert_eq!(req.temperature, Some(0.0));
    }

    #[test]
    fn empty_tools_are_cleared() {
        let req = ChatRequest::new("m").tools(Vec::new());
        assert!(req.tools.is_none());
    }

    #[test]
    fn generated_schema_is_named_after_type() {
        let (name, schema) = generate_json_schema::<Country>();
        assert_eq!(name, "Country");
        assert!(schema.get("$schema").is_none());
        assert!(schema["properties"]["capital"].is_object());
    }

    #[test]
    fn json_schema_format_is_strict() {
        let format = ResponseFormat::json_schema("Country", serde_json::json!({"type": "object"}));
        assert!(format.strict);
        assert_eq!(format.name, "Country");
    }

    #[test]
    fn stop_reason_covers_both_vocabularies() {
        assert_eq!(StopReason::parse("end_turn"), StopReason::Stop);
        assert_eq!(StopReason::parse("stop"), StopReason::Stop);
        assert_eq!(StopReason::parse("max_tokens"), StopReason::Length);
        assert_eq!(StopReason::parse("tool_use"), StopReason::ToolCalls);
        assert_eq!(StopReason::parse("TOOL_CALLS"), StopReason::ToolCalls);
        assert_eq!(StopReason::parse("refusal"), StopReason::ContentFilter);
        assert!(StopReason::Length.is_truncated());
        assert!(!StopReason::ToolCalls.is_truncated());
    }

    #[test]
    fn tool_call_response_sets_stop_reason() {
        let resp = ChatResponse::from_tool_calls(vec![ToolCall::function("c1", "f", "{}")]);
        assert_eq!(resp.stop_reason, StopReason::ToolCalls);
        assert_eq!(resp.tool_calls().map(<[ToolCall]>::len), Some(1));
        assert!(resp.text().is_none());
    }
}
