//! Prelude module for convenient imports.
//!
//! This module re-exports commonly used types and traits for easy access.
//!
//! # Usage
//!
//! ```rust,ignore
//! use scout::prelude::*;
//! ```

#[cfg(feature = "anthropic")]
pub use crate::llms::{Anthropic, AnthropicConfig};
#[cfg(feature = "openai")]
pub use crate::llms::{OpenAI, OpenAIConfig};

pub use crate::agent::{
    Agent, NextStep, OutputSchema, OutputStrategy, RunConfig, RunResult, Runner, StepInfo,
    StructuredResult, ToolCallRecord, ToolCallRequest, UserInput,
};
pub use crate::chat::{
    ChatProvider, ChatRequest, ChatResponse, ResponseFormat, SharedChatProvider, StopReason,
    ToolChoice,
};
pub use crate::error::{Error, LlmError, LlmErrorKind, Result, ToolError};
pub use crate::llms::MockProvider;
pub use crate::message::{FunctionCall, Message, Role, ToolCall};
pub use crate::tool::{
    BoxedTool, DynTool, Tool, ToolCallResult, ToolDefinition, parameters_schema_for,
};
pub use crate::usage::Usage;
