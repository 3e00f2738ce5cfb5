//! OpenAI Chat Completions backend.
//!
//! Supports tool calling and strict JSON-schema structured outputs.

mod chat;
mod client;
mod config;
mod types;

pub use client::OpenAI;
pub use config::OpenAIConfig;
