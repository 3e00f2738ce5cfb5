//! Agent configuration types.
//!
//! The [`Agent`] struct defines an agent's identity, behavior, capabilities,
//! and its own LLM provider. It contains no execution logic; the
//! [`Runner`](super::Runner) drives it.
//!
//! # Example
//!
//! ```rust,ignore
//! use scout::agent::Agent;
//!
//! let agent = Agent::new("city-guide")
//!     .instructions("You are a concise city guide.")
//!     .provider(provider.clone())
//!     .tool(Box::new(GetCapital))
//!     .output_type::<CityGuide>();
//!
//! let guide = agent.run_structured::<CityGuide>("City guide for the capital of France.", Default::default()).await?;
//! ```

use std::fmt;

use futures::future::BoxFuture;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::chat::{ResponseFormat, SharedChatProvider, generate_json_schema};
use crate::error::Result;
use crate::tool::{BoxedTool, ToolDefinition};

use super::result::{RunConfig, RunResult, StructuredResult, UserInput};

/// Schema specification for structured agent output.
///
/// How the schema reaches the model is decided by the agent's
/// [`OutputStrategy`]. Either way the final answer ends up as a JSON
/// [`Value`] in [`RunResult::output`](super::RunResult).
#[derive(Debug, Clone, PartialEq)]
pub struct OutputSchema {
    name: String,
    schema: Value,
}

impl OutputSchema {
    /// Schema for `T`, named after the type.
    ///
    /// The root object is closed (`additionalProperties: false`) so strict
    /// decoding accepts it.
    #[must_use]
    pub fn from_type<T: schemars::JsonSchema>() -> Self {
        let (name, mut schema) = generate_json_schema::<T>();
        if let Value::Object(ref mut map) = schema {
            map.entry("additionalProperties")
                .or_insert(Value::Bool(false));
        }
        Self { name, schema }
    }

    /// Returns the schema name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the JSON Schema definition.
    #[must_use]
    pub const fn schema(&self) -> &Value {
        &self.schema
    }

    /// Converts this into a [`ResponseFormat`] for the native strategy.
    #[must_use]
    pub fn to_response_format(&self) -> ResponseFormat {
        ResponseFormat::json_schema(&self.name, self.schema.clone())
    }

    /// Converts this into the synthetic output tool for the tool strategy.
    ///
    /// The tool is named after the schema; its arguments are the answer.
    #[must_use]
    pub fn to_tool_definition(&self) -> ToolDefinition {
        let mut parameters = self.schema.clone();
        if let Value::Object(ref mut map) = parameters {
            map.remove("title");
        }
        ToolDefinition::new(
            &self.name,
            format!(
                "Return the final answer as a {} object. Call this on its own, after every other tool result is in.",
                self.name
            ),
            parameters,
        )
    }
}

/// How an [`OutputSchema`] is communicated to the model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputStrategy {
    /// Native if the provider supports JSON-schema decoding, tool otherwise.
    #[default]
    Auto,
    /// `response_format` with a strict JSON schema.
    Native,
    /// A synthetic tool whose arguments are the final answer.
    Tool,
}

impl OutputStrategy {
    /// Resolve [`Auto`](Self::Auto) against a provider's capabilities.
    #[must_use]
    pub const fn resolve(self, supports_json_mode: bool) -> Self {
        match self {
            Self::Auto if supports_json_mode => Self::Native,
            Self::Auto => Self::Tool,
            other => other,
        }
    }
}

/// A pure configuration struct defining an AI agent.
///
/// - **`name`** identifies the agent in logs and results
/// - **`instructions`** is the system prompt
/// - **`model`** overrides the provider's default model when non-empty
/// - **`tools`** are the capabilities the model may call
/// - **`max_steps`** bounds the number of model turns
/// - **`output_schema`** turns the agent into a structured one
pub struct Agent {
    pub(crate) name: String,
    pub(crate) instructions: String,
    pub(crate) model: String,
    pub(crate) provider: Option<SharedChatProvider>,
    pub(crate) tools: Vec<BoxedTool>,
    pub(crate) max_steps: usize,
    pub(crate) temperature: Option<f32>,
    pub(crate) max_tokens: Option<u32>,
    pub(crate) output_schema: Option<OutputSchema>,
    pub(crate) output_strategy: OutputStrategy,
}

impl fmt::Debug for Agent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Agent")
            .field("name", &self.name)
            .field("instructions", &self.instructions)
            .field("model", &self.model)
            .field(
                "provider",
                &self.provider.as_ref().map(|p| p.provider_name()),
            )
            .field(
                "tools",
                &self.tools.iter().map(|t| t.name()).collect::<Vec<_>>(),
            )
            .field("max_steps", &self.max_steps)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field(
                "output_schema",
                &self.output_schema.as_ref().map(OutputSchema::name),
            )
            .field("output_strategy", &self.output_strategy)
            .finish()
    }
}

impl Agent {
    /// Default maximum number of model turns.
    pub const DEFAULT_MAX_STEPS: usize = 10;

    /// Create a new agent with the given name and defaults.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            instructions: String::new(),
            model: String::new(),
            provider: None,
            tools: Vec::new(),
            max_steps: Self::DEFAULT_MAX_STEPS,
            temperature: None,
            max_tokens: None,
            output_schema: None,
            output_strategy: OutputStrategy::Auto,
        }
    }

    /// Set the system instructions.
    #[must_use]
    pub fn instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = instructions.into();
        self
    }

    /// Set the LLM model identifier.
    #[must_use]
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the LLM provider for this agent.
    #[must_use]
    pub fn provider(mut self, provider: SharedChatProvider) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Add a tool to this agent.
    #[must_use]
    pub fn tool(mut self, tool: BoxedTool) -> Self {
        self.tools.push(tool);
        self
    }

    /// Set the maximum number of model turns.
    #[must_use]
    pub const fn max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Set the sampling temperature.
    #[must_use]
    pub const fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set the maximum tokens per model response.
    #[must_use]
    pub const fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Set structured output by inferring the JSON Schema from a Rust type.
    ///
    /// The final output can be decoded with [`RunResult::parse`] or obtained
    /// directly through [`Agent::run_structured`].
    #[must_use]
    pub fn output_type<T: schemars::JsonSchema>(mut self) -> Self {
        self.output_schema = Some(OutputSchema::from_type::<T>());
        self
    }

    /// Choose how the output schema reaches the model.
    #[must_use]
    pub const fn output_strategy(mut self, strategy: OutputStrategy) -> Self {
        self.output_strategy = strategy;
        self
    }

    /// Returns the agent's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the agent's instructions.
    #[must_use]
    pub fn get_instructions(&self) -> &str {
        &self.instructions
    }

    /// Returns the maximum number of model turns.
    #[must_use]
    pub const fn get_max_steps(&self) -> usize {
        self.max_steps
    }

    /// Returns the output schema, if any.
    #[must_use]
    pub const fn get_output_schema(&self) -> Option<&OutputSchema> {
        self.output_schema.as_ref()
    }

    /// Returns the number of tools registered on this agent.
    #[must_use]
    pub fn tool_count(&self) -> usize {
        self.tools.len()
    }

    /// Run this agent to completion with the given input.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Agent`](crate::Error::Agent) if no provider is
    /// configured, or propagates errors from the [`Runner`](super::Runner).
    pub fn run<'a>(
        &'a self,
        input: impl Into<UserInput>,
        config: RunConfig,
    ) -> BoxFuture<'a, Result<RunResult>> {
        super::Runner::run(self, input, config)
    }

    /// Run this agent and decode the final answer into `T`.
    ///
    /// # Errors
    ///
    /// Everything [`Agent::run`] returns, plus
    /// [`Error::StructuredOutput`](crate::Error::StructuredOutput) when the
    /// answer does not deserialize into `T`.
    pub async fn run_structured<T: DeserializeOwned>(
        &self,
        input: impl Into<UserInput>,
        config: RunConfig,
    ) -> Result<StructuredResult<T>> {
        let run = self.run(input, config).await?;
        let value = run.parse::<T>()?;
        Ok(StructuredResult { value, run })
    }
}
