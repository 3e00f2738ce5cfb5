//! Agent module: configuration, run results, and the execution engine.
//!
//! - **[`Agent`]** is a self-contained description of an agent: its
//!   instructions, provider, tools, and optional output schema.
//! - **[`Runner`]** is a stateless engine that drives the agent through the
//!   "request, tool calls, tool results, final answer" exchange.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use scout::agent::{Agent, RunConfig};
//!
//! let agent = Agent::new("assistant")
//!     .instructions("You are a research assistant.")
//!     .provider(provider.clone())
//!     .output_type::<ResearchResponse>();
//!
//! let answer = agent
//!     .run_structured::<ResearchResponse>("what is java programming language?", RunConfig::default())
//!     .await?;
//! println!("{}", answer.value.topic);
//! ```

mod config;
pub mod result;
mod runner;

pub use config::{Agent, OutputSchema, OutputStrategy};
pub use result::{
    NextStep, RunConfig, RunResult, StepInfo, StructuredResult, ToolCallRecord, ToolCallRequest,
    UserInput,
};
pub use runner::Runner;
