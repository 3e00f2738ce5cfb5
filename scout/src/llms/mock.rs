//! Scripted provider for tests and offline runs.
//!
//! [`MockProvider`] replays a queue of canned [`ChatResponse`]s in order and
//! records every request it receives, so tests can assert on exactly what
//! the runner sent.

use std::collections::VecDeque;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::chat::{ChatProvider, ChatRequest, ChatResponse};
use crate::error::{LlmError, Result};

/// A provider that returns pre-scripted responses.
///
/// # Example
///
/// ```rust,ignore
/// use scout::llms::MockProvider;
/// use scout::chat::ChatResponse;
///
/// let provider = MockProvider::new(vec![
///     ChatResponse::from_text(r#"{"topic": "Java"}"#),
/// ]);
/// ```
#[derive(Debug)]
pub struct MockProvider {
    json_mode: bool,
    responses: Mutex<VecDeque<ChatResponse>>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl MockProvider {
    /// Create a provider that answers with `responses`, one per call.
    #[must_use]
    pub fn new(responses: Vec<ChatResponse>) -> Self {
        Self {
            json_mode: false,
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Report native JSON-schema support, as OpenAI does.
    #[must_use]
    pub const fn with_json_mode(mut self, enabled: bool) -> Self {
        self.json_mode = enabled;
        self
    }

    /// Every request received so far, oldest first.
    pub async fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().await.clone()
    }
}

#[async_trait]
impl ChatProvider for MockProvider {
    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse> {
        self.requests.lock().await.push(request.clone());
        self.responses
            .lock()
            .await
            .pop_front()
            .ok_or_else(|| LlmError::internal("mock provider has no responses left").into())
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }

    fn default_model(&self) -> &str {
        "mock-model"
    }

    fn supports_json_mode(&self) -> bool {
        self.json_mode
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_replays_in_order_then_fails() {
        let provider = MockProvider::new(vec![
            ChatResponse::from_text("first"),
            ChatResponse::from_text("second"),
        ]);
        let request = ChatRequest::new("mock-model").user("hi");

        let r1 = provider.chat(&request).await.expect("first response");
        assert_eq!(r1.text(), Some("first"));
        let r2 = provider.chat(&request).await.expect("second response");
        assert_eq!(r2.text(), Some("second"));

        let err = provider.chat(&request).await.expect_err("exhausted");
        assert!(err.to_string().contains("no responses left"));
        assert_eq!(provider.requests().await.len(), 3);
    }

    #[test]
    fn test_metadata() {
        let provider = MockProvider::new(Vec::new()).with_json_mode(true);
        assert_eq!(provider.provider_name(), "mock");
        assert_eq!(provider.default_model(), "mock-model");
        assert!(provider.supports_json_mode());
    }
}
