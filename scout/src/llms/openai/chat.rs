//! [`ChatProvider`] for the Chat Completions backend.

use async_trait::async_trait;
use tracing::debug;

use crate::chat::{ChatProvider, ChatRequest, ChatResponse, StopReason};
use crate::error::{LlmError, Result};
use crate::message::{Message, Role, ToolCall};

use super::client::OpenAI;
use super::types::CompletionResponse;

impl OpenAI {
    /// Turn the first choice into a [`ChatResponse`]. A refusal without
    /// content is an error with code `refusal`.
    pub(crate) fn parse_response(response: CompletionResponse) -> Result<ChatResponse> {
        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::response_format("at least one choice", "empty choices"))?;

        if choice.message.content.is_none()
            && let Some(refusal) = choice.message.refusal
        {
            return Err(LlmError::provider_code("openai", "refusal", refusal).into());
        }

        let stop_reason = choice
            .finish_reason
            .as_deref()
            .map_or(StopReason::Stop, StopReason::parse);

        let tool_calls = choice
            .message
            .tool_calls
            .map(|calls| {
                calls
                    .into_iter()
                    .map(|tc| ToolCall::function(tc.id, tc.function.name, tc.function.arguments))
                    .collect::<Vec<_>>()
            })
            .filter(|calls| !calls.is_empty());

        let message = Message {
            role: Role::Assistant,
            content: choice.message.content,
            tool_calls,
            tool_call_id: None,
            name: None,
        };

        let mut parsed = ChatResponse::new(message)
            .with_stop_reason(stop_reason)
            .with_model(response.model)
            .with_id(response.id);
        if let Some(usage) = response.usage {
            parsed = parsed.with_usage(usage);
        }
        Ok(parsed)
    }
}

#[async_trait]
impl ChatProvider for OpenAI {
    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse> {
        let url = self.chat_url();
        let body = self.build_body(request);
        debug!(model = %body.model, messages = body.messages.len(), "Sending OpenAI request");

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
        let parsed: CompletionResponse = serde_json::from_str(&response_text).map_err(|e| {
            LlmError::response_format(
                "valid OpenAI response",
                format!("parse error: {e}, response: {response_text}"),
            )
        })?;

        Self::parse_response(parsed)
    }

    fn provider_name(&self) -> &'static str {
        "openai"
    }

    fn default_model(&self) -> &str {
        self.model()
    }

    fn supports_json_mode(&self) -> bool {
        true
    }
}
