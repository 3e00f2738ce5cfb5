//! Anthropic Messages API wire types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::usage::Usage;

/// Request body for `POST /v1/messages`.
#[derive(Debug, Clone, Serialize)]
pub struct AnthropicRequest {
    pub model: String,
    pub max_tokens: u32,
    pub messages: Vec<AnthropicMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<AnthropicTool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<Value>,
}

/// A single conversation turn. Only `user` and `assistant` roles exist.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnthropicMessage {
    pub role: &'static str,
    pub content: AnthropicContent,
}

/// Turn content: plain text, or a list of typed blocks.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AnthropicContent {
    Text(String),
    Blocks(Vec<ContentBlock>),
}

/// Request-side content block.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Text {
        text: String,
    },
    ToolUse {
        id: String,
        name: String,
        input: Value,
    },
    ToolResult {
        tool_use_id: String,
        content: String,
    },
}

/// Tool definition in Anthropic format.
#[derive(Debug, Clone, Serialize)]
pub struct AnthropicTool {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

/// Response body of a successful call.
#[derive(Debug, Clone, Deserialize)]
pub struct AnthropicResponse {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub content: Vec<ResponseBlock>,
    pub stop_reason: Option<String>,
    pub usage: Option<AnthropicUsage>,
}

/// Response-side content block. Block types this client does not use are
/// skipped.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResponseBlock {
    Text {
        text: String,
    },
    ToolUse {
        id: String,
        name: String,
        #[serde(default)]
        input: Value,
    },
    #[serde(other)]
    Other,
}

/// Token counts as reported by Anthropic.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct AnthropicUsage {
    #[serde(default)]
    pub input_tokens: u32,
    #[serde(default)]
    pub output_tokens: u32,
}

impl From<AnthropicUsage> for Usage {
    fn from(usage: AnthropicUsage) -> Self {
        Self::new(usage.input_tokens, usage.output_tokens)
    }
}

/// Error envelope: `{"type": "error", "error": {"type": ..., "message": ...}}`.
#[derive(Debug, Clone, Deserialize)]
pub struct AnthropicErrorResponse {
    pub error: AnthropicError,
}

/// Error details.
#[derive(Debug, Clone, Deserialize)]
pub struct AnthropicError {
    #[serde(rename = "type")]
    pub error_type: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_serialization() {
        let text = AnthropicMessage {
            role: "user",
            content: AnthropicContent::Text("hi".into()),
        };
        assert_eq!(
            serde_json::to_value(&text).expect("serializes"),
            serde_json::json!({"role": "user", "content": "hi"})
        );

        let blocks = AnthropicContent::Blocks(vec![ContentBlock::ToolResult {
            tool_use_id: "toolu_1".into(),
            content: "Paris".into(),
        }]);
        assert_eq!(
            serde_json::to_value(&blocks).expect("serializes"),
            serde_json::json!([{"type": "tool_result", "tool_use_id": "toolu_1", "content": "Paris"}])
        );
    }

    #[test]
    fn test_response_skips_unknown_blocks() {
        let json = r#"{
            "id": "msg_1", "model": "claude", "stop_reason": "end_turn",
            "content": [{"type": "thinking", "thinking": "..."}, {"type": "text", "text": "ok"}],
            "usage": {"input_tokens": 5, "output_tokens": 2}
        }"#;
        let resp: AnthropicResponse = serde_json::from_str(json).expect("deserializes");
        assert_eq!(resp.content.len(), 2);
        assert!(matches!(resp.content[0], ResponseBlock::Other));
        assert_eq!(Usage::from(resp.usage.unwrap_or_default()), Usage::new(5, 2));
    }

    #[test]
    fn test_error_deserialization() {
        let json = r#"{"type": "error", "error": {"type": "overloaded_error", "message": "Overloaded"}}"#;
        let err: AnthropicErrorResponse = serde_json::from_str(json).expect("deserializes");
        assert_eq!(err.error.error_type, "overloaded_error");
        assert_eq!(err.error.message, "Overloaded");
    }
}
