//! Anthropic Messages API backend.
//!
//! Tool calling is supported natively. There is no JSON-schema response
//! format, so structured agents on this backend answer through a synthetic
//! output tool.

mod chat;
mod client;
mod config;
mod types;

pub use client::Anthropic;
pub use config::AnthropicConfig;
