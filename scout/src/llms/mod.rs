//! LLM backend implementations.
//!
//! Each backend implements [`ChatProvider`](crate::chat::ChatProvider) and
//! lives in its own submodule.
//!
//! # Available Backends
//!
//! - [`anthropic`] - Anthropic Messages API (Claude)
//! - [`openai`] - OpenAI Chat Completions API (GPT-4o, etc.)
//! - [`mock`] - Scripted responses for tests

#[cfg(feature = "anthropic")]
pub mod anthropic;

#[cfg(feature = "openai")]
pub mod openai;

pub mod mock;

#[cfg(feature = "anthropic")]
pub use anthropic::{Anthropic, AnthropicConfig};

#[cfg(feature = "openai")]
pub use openai::{OpenAI, OpenAIConfig};

pub use mock::MockProvider;
