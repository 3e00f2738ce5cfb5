//! Anthropic API client implementation.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use serde_json::Value;

use crate::chat::{ChatRequest, ToolChoice};
use crate::error::{LlmError, Result};
use crate::message::{Message, Role};
use crate::tool::ToolDefinition;

use super::config::AnthropicConfig;
use super::types::{
    AnthropicContent, AnthropicErrorResponse, AnthropicMessage, AnthropicRequest, AnthropicTool,
    ContentBlock,
};

/// Anthropic API client.
#[derive(Clone)]
pub struct Anthropic {
    pub(crate) config: Arc<AnthropicConfig>,
    pub(crate) client: Client,
}

impl std::fmt::Debug for Anthropic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Anthropic")
            .field("base_url", &self.config.base_url)
            .field("model", &self.config.model)
            .field("api_key", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl Anthropic {
    /// Create a new Anthropic client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an authentication error for an empty API key, or an internal
    /// error if the HTTP client cannot be built.
    pub fn new(config: AnthropicConfig) -> Result<Self> {
        if config.api_key.is_empty() {
            return Err(LlmError::auth("anthropic", "API key is required").into());
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

    /// Get the default model.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.config.model
    }

    pub(crate) fn messages_url(&self) -> String {
        format!("{}/v1/messages", self.config.base_url.trim_end_matches('/'))
    }

    pub(crate) fn build_request(&self, url: &str) -> reqwest::RequestBuilder {
        self.client
            .post(url)
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", &self.config.api_version)
            .header("Content-Type", "application/json")
    }

    /// Split a transcript into the `system` prompt and the turn list.
    ///
    /// Consecutive tool results are merged into a single user turn, since
    /// Anthropic expects every `tool_use` of an assistant turn to be answered
    /// by the next user turn.
    pub(crate) fn convert_messages(messages: &[Message]) -> (Option<String>, Vec<AnthropicMessage>) {
        let mut system = Vec::new();
        let mut turns: Vec<AnthropicMessage> = Vec::new();
        let mut merging_tool_results = false;

        for msg in messages {
            match msg.role {
                Role::System => {
                    if let Some(text) = msg.text() {
                        system.push(text.to_owned());
                    }
                    merging_tool_results = false;
                }
                Role::User => {
                    turns.push(AnthropicMessage {
                        role: "user",
                        content: AnthropicContent::Text(msg.text().unwrap_or_default().to_owned()),
                    });
                    merging_tool_results = false;
                }
                Role::Assistant => {
                    turns.push(AnthropicMessage {
                        role: "assistant",
                        content: Self::assistant_content(msg),
                    });
                    merging_tool_results = false;
                }
                Role::Tool => {
                    let block = ContentBlock::ToolResult {
                        tool_use_id: msg.tool_call_id.clone().unwrap_or_default(),
                        content: msg.text().unwrap_or_default().to_owned(),
                    };
                    if merging_tool_results
                        && let Some(AnthropicMessage {
                            content: AnthropicContent::Blocks(blocks),
                            ..
                        }) = turns.last_mut()
                    {
                        blocks.push(block);
                    } else {
                        turns.push(AnthropicMessage {
                            role: "user",
                            content: AnthropicContent::Blocks(vec![block]),
                        });
                    }
                    merging_tool_results = true;
                }
            }
        }

        let system = (!system.is_empty()).then(|| system.join("\n"));
        (system, turns)
    }

    fn assistant_content(msg: &Message) -> AnthropicContent {
        let Some(calls) = msg.tool_calls.as_ref().filter(|c| !c.is_empty()) else {
            return AnthropicContent::Text(msg.text().unwrap_or_default().to_owned());
        };

        let mut blocks = Vec::with_capacity(calls.len() + 1);
        if let Some(text) = msg.text().filter(|t| !t.is_empty()) {
            blocks.push(ContentBlock::Text {
                text: text.to_owned(),
            });
        }
        blocks.extend(calls.iter().map(|call| ContentBlock::ToolUse {
            id: call.id.clone(),
            name: call.function.name.clone(),
            input: call
                .arguments_value()
                .unwrap_or_else(|_| Value::Object(serde_json::Map::new())),
        }));
        AnthropicContent::Blocks(blocks)
    }

    pub(crate) fn convert_tool(tool: &ToolDefinition) -> AnthropicTool {
        AnthropicTool {
            name: tool.name.clone(),
            description: tool.description.clone(),
            input_schema: tool.parameters.clone(),
        }
    }

    /// Tool calls run one at a time, so the model is asked for at most one
    /// `tool_use` block per turn.
    pub(crate) fn convert_tool_choice(choice: ToolChoice) -> Value {
        let kind = match choice {
            ToolChoice::Auto => "auto",
            ToolChoice::Required => "any",
        };
        serde_json::json!({"type": kind, "disable_parallel_tool_use": true})
    }

    /// Build the request body.
    pub(crate) fn build_body(&self, request: &ChatRequest) -> AnthropicRequest {
        let (system, messages) = Self::convert_messages(&request.messages);

        let tools: Option<Vec<AnthropicTool>> = request
            .tools
            .as_ref()
            .filter(|t| !t.is_empty())
            .map(|t| t.iter().map(Self::convert_tool).collect());

        let model = if request.model.is_empty() {
            self.config.model.clone()
        } else {
            request.model.clone()
        };

        AnthropicRequest {
            model,
            max_tokens: request.max_tokens.unwrap_or(self.config.default_max_tokens),
            messages,
            system,
            temperature: request.temperature,
            tool_choice: tools
                .as_ref()
                .and(request.tool_choice)
                .map(Self::convert_tool_choice),
            tools,
        }
    }

    /// Parse an error response from Anthropic.
    pub(crate) fn parse_error(status: u16, body: &str) -> LlmError {
        if let Ok(error_response) = serde_json::from_str::<AnthropicErrorResponse>(body) {
            let error = error_response.error;
            return match status {
                401 | 403 => LlmError::auth("anthropic", error.message),
                429 => LlmError::rate_limited("anthropic"),
                _ => LlmError::provider_code("anthropic", error.error_type, error.message),
            };
        }

        LlmError::http_status(status, body.to_owned())
    }
}
