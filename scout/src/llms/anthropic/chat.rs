//! Anthropic ChatProvider implementation.

use async_trait::async_trait;
use tracing::debug;

use crate::chat::{ChatProvider, ChatRequest, ChatResponse, StopReason};
use crate::error::{LlmError, Result};
use crate::message::{Message, Role, ToolCall};

use super::client::Anthropic;
use super::types::{AnthropicResponse, ResponseBlock};

impl Anthropic {
    /// Parse the response into ChatResponse.
    pub(crate) fn parse_response(response: AnthropicResponse) -> ChatResponse {
        let mut text = String::new();
        let mut tool_calls = Vec::new();

        for block in response.content {
            match block {
                ResponseBlock::Text { text: part } => {
                    if !text.is_empty() {
                        text.push('\n');
                    }
                    text.push_str(&part);
                }
                ResponseBlock::ToolUse { id, name, input } => {
                    tool_calls.push(ToolCall::function(id, name, input.to_string()));
                }
                ResponseBlock::Other => {}
            }
        }

        let message = Message {
            role: Role::Assistant,
            content: (!text.is_empty()).then_some(text),
            tool_calls: (!tool_calls.is_empty()).then_some(tool_calls),
            tool_call_id: None,
            name: None,
        };

        let stop_reason = response
            .stop_reason
            .as_deref()
            .map_or(StopReason::Stop, StopReason::parse);

        let mut parsed = ChatResponse::new(message)
            .with_stop_reason(stop_reason)
            .with_model(response.model)
            .with_id(response.id);
        if let Some(usage) = response.usage {
            parsed = parsed.with_usage(usage.into());
        }
        parsed
    }
}

#[async_trait]
impl ChatProvider for Anthropic {
    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse> {
        let url = self.messages_url();
        let body = self.build_body(request);
        debug!(model = %body.model, messages = body.messages.len(), "Sending Anthropic request");

        let response = self
            .build_request(&url)
            .json(&body)
            .send()
            .await
            .map_err(LlmError::from)?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(Self::parse_error(status.as_u16(), &error_text).into());
        }

        let response_text = response.text().await.map_err(LlmError::from)?;
        let parsed: AnthropicResponse = serde_json::from_str(&response_text).map_err(|e| {
            LlmError::response_format(
                "valid Anthropic response",
                format!("parse error: {e}, response: {response_text}"),
            )
        })?;

        Ok(Self::parse_response(parsed))
    }

    fn provider_name(&self) -> &'static str {
        "anthropic"
    }

    fn default_model(&self) -> &str {
        self.model()
    }
}
