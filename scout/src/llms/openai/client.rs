//! HTTP client and request encoding for Chat Completions.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;

use crate::chat::{ChatRequest, ResponseFormat, ToolChoice};
use crate::error::{LlmError, Result};
use crate::message::{Message, ToolCall};
use crate::tool::ToolDefinition;

use super::config::OpenAIConfig;
use super::types::{
    CompletionRequest, ErrorEnvelope, WireFunction, WireFunctionCall, WireJsonSchema,
    WireMessage, WireResponseFormat, WireTool, WireToolCall,
};

/// Client for an OpenAI-compatible Chat Completions endpoint.
#[derive(Clone)]
pub struct OpenAI {
    pub(crate) config: Arc<OpenAIConfig>,
    pub(crate) client: Client,
}

impl std::fmt::Debug for OpenAI {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAI")
            .field("base_url", &self.config.base_url)
            .field("model", &self.config.model)
            .field("api_key", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl OpenAI {
    /// Build a client.
    ///
    /// # Errors
    ///
    /// An authentication error for an empty API key, or an internal error
    /// when the HTTP client cannot be built.
    pub fn new(config: OpenAIConfig) -> Result<Self> {
        if config.api_key.is_empty() {
            return Err(LlmError::auth("openai", "API key is required").into());
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| LlmError::internal(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            config: Arc::new(config),
            client,
        })
    }

    /// Model used when a request does not name one.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.config.model
    }

    pub(crate) fn chat_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }

    pub(crate) fn build_request(&self, url: &str) -> reqwest::RequestBuilder {
        let request = self.client.post(url).bearer_auth(&self.config.api_key);
        match &self.config.organization {
            Some(org) => request.header("OpenAI-Organization", org),
            None => request,
        }
    }

    fn convert_tool_call(call: &ToolCall) -> WireToolCall<'_> {
        WireToolCall {
            id: &call.id,
            kind: "function",
            function: WireFunctionCall {
                name: &call.function.name,
                arguments: &call.function.arguments,
            },
        }
    }

    pub(crate) fn convert_message(msg: &Message) -> WireMessage<'_> {
        WireMessage {
            role: msg.role.as_str(),
            content: msg.content.as_deref(),
            tool_calls: msg
                .tool_calls
                .as_ref()
                .map(|calls| calls.iter().map(Self::convert_tool_call).collect()),
            tool_call_id: msg.tool_call_id.as_deref(),
            name: msg.name.as_deref(),
        }
    }

    pub(crate) fn convert_tool(tool: &ToolDefinition) -> WireTool<'_> {
        WireTool {
            kind: "function",
            function: WireFunction {
                name: &tool.name,
                description: &tool.description,
                parameters: &tool.parameters,
            },
        }
    }

    pub(crate) const fn convert_tool_choice(choice: ToolChoice) -> &'static str {
        match choice {
            ToolChoice::Auto => "auto",
            ToolChoice::Required => "required",
        }
    }

    fn convert_response_format(format: &ResponseFormat) -> WireResponseFormat<'_> {
        WireResponseFormat {
            kind: "json_schema",
            json_schema: WireJsonSchema {
                name: &format.name,
                schema: &format.schema,
                strict: format.strict,
            },
        }
    }

    pub(crate) fn build_body<'a>(&'a self, request: &'a ChatRequest) -> CompletionRequest<'a> {
        let tools: Option<Vec<WireTool<'a>>> = request
            .tools
            .as_deref()
            .filter(|t| !t.is_empty())
            .map(|t| t.iter().map(Self::convert_tool).collect());
        let has_tools = tools.is_some();

        CompletionRequest {
            model: if request.model.is_empty() {
                &self.config.model
            } else {
                &request.model
            },
            messages: request.messages.iter().map(Self::convert_message).collect(),
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            tools,
            tool_choice: request
                .tool_choice
                .filter(|_| has_tools)
                .map(Self::convert_tool_choice),
            parallel_tool_calls: has_tools.then_some(false),
            response_format: request
                .response_format
                .as_ref()
                .map(Self::convert_response_format),
        }
    }

    /// Classify a non-success reply. Bodies that are not an OpenAI error
    /// object keep the raw status.
    pub(crate) fn parse_error(status: u16, body: &str) -> LlmError {
        let Ok(ErrorEnvelope { error }) = serde_json::from_str::<ErrorEnvelope>(body) else {
            return LlmError::http_status(status, body);
        };
        match status {
            401 | 403 => LlmError::auth("openai", error.message),
            429 => LlmError::rate_limited("openai"),
            _ => {
                let code = error
                    .code
                    .or(error.kind)
                    .unwrap_or_else(|| status.to_string());
                LlmError::provider_code("openai", code, error.message)
            }
        }
    }
}
