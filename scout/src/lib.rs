//! Scout - a small tool-calling agent runtime with structured output.
//!
//! An [`Agent`](agent::Agent) pairs instructions, a chat provider and a set
//! of tools with an optional output schema. The [`Runner`](agent::Runner)
//! drives the model through tool calls until it produces a final answer,
//! which is decoded into a typed record for structured agents.

pub mod agent;
pub mod chat;
pub mod error;
pub mod llms;
pub mod message;
pub mod prelude;
pub mod tool;
pub mod usage;

pub use error::{Error, LlmError, Result, ToolError};
