//! Tools the model can call during a run.
//!
//! A tool exposes a name, a description the model reads when deciding
//! whether to call it, and a JSON schema for its arguments. Implement the
//! typed [`Tool`] trait; agents store tools as [`BoxedTool`] through the
//! object-safe [`DynTool`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::chat::generate_json_schema;
use crate::error::ToolError;

/// What a provider is told about a tool.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub struct ToolDefinition {
    /// Name the model calls the tool by, e.g. `get_capital`.
    pub name: String,
    /// Shown to the model.
    pub description: String,
    /// JSON schema of the arguments object.
    pub parameters: Value,
}

impl ToolDefinition {
    /// Describe a tool.
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>, parameters: Value) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters,
        }
    }
}

/// Argument schema for `T`, always shaped as an object with `properties`.
#[must_use]
pub fn parameters_schema_for<T: schemars::JsonSchema>() -> Value {
    let (_, mut schema) = generate_json_schema::<T>();
    if let Value::Object(ref mut map) = schema {
        map.remove("title");
        map.entry("type")
            .or_insert_with(|| Value::String("object".to_owned()));
        map.entry("properties")
            .or_insert_with(|| Value::Object(serde_json::Map::new()));
    }
    schema
}

/// A typed tool.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Name the model calls the tool by.
    const NAME: &'static str;

    /// Decoded from the call's JSON arguments.
    type Args: for<'de> Deserialize<'de> + Send;

    /// Encoded as JSON before it is handed back to the model.
    type Output: Serialize + Send;

    /// Failure type, reported to the model as the tool result.
    type Error: Into<ToolError> + Send;

    /// Name the model calls the tool by.
    fn name(&self) -> &'static str {
        Self::NAME
    }

    /// What the tool does, in words the model can act on.
    fn description(&self) -> String;

    /// JSON schema of [`Tool::Args`].
    fn parameters_schema(&self) -> Value;

    /// Run the tool.
    async fn call(&self, args: Self::Args) -> Result<Self::Output, Self::Error>;

    /// The definition sent to providers.
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(self.name(), self.description(), self.parameters_schema())
    }

    /// Decode `args`, run the tool and encode its output.
    ///
    /// `args` may be an object or a string holding JSON.
    async fn call_json(&self, args: Value) -> Result<Value, ToolError>
    where
        Self::Output: 'static,
    {
        let typed_args: Self::Args = match &args {
            Value::String(s) => serde_json::from_str(s)?,
            _ => serde_json::from_value(args)?,
        };

        let output = self.call(typed_args).await.map_err(Into::into)?;
        serde_json::to_value(output).map_err(|e| ToolError::execution(e.to_string()))
    }
}

/// A tool behind dynamic dispatch.
pub type BoxedTool = Box<dyn DynTool>;

/// Object-safe view of [`Tool`], implemented for every tool.
#[async_trait]
pub trait DynTool: Send + Sync {
    /// Name the model calls the tool by.
    fn name(&self) -> &str;

    /// The definition sent to providers.
    fn definition(&self) -> ToolDefinition;

    /// See [`Tool::call_json`].
    async fn call_json(&self, args: Value) -> Result<Value, ToolError>;
}

#[async_trait]
impl<T: Tool + 'static> DynTool for T
where
    T::Output: 'static,
{
    fn name(&self) -> &str {
        Tool::name(self)
    }

    fn definition(&self) -> ToolDefinition {
        Tool::definition(self)
    }

    async fn call_json(&self, args: Value) -> Result<Value, ToolError> {
        Tool::call_json(self, args).await
    }
}

/// Outcome of one tool call, keyed by the call id it answers.
#[derive(Debug, Clone)]
pub struct ToolCallResult {
    /// Id of the call being answered.
    pub id: String,
    /// Tool that was called.
    pub name: String,
    /// Encoded output, or the failure.
    pub result: Result<Value, ToolError>,
}

impl ToolCallResult {
    /// A call that produced `value`.
    #[must_use]
    pub fn success(id: impl Into<String>, name: impl Into<String>, value: Value) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            result: Ok(value),
        }
    }

    /// A call that failed with `error`.
    #[must_use]
    pub fn failure(id: impl Into<String>, name: impl Into<String>, error: ToolError) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            result: Err(error),
        }
    }

    /// Whether the call produced a value.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    /// Text of the tool message. Strings pass through unquoted, other
    /// values are compact JSON, and failures read `Error: <message>`.
    #[must_use]
    pub fn to_string_for_llm(&self) -> String {
        match &self.result {
            Ok(Value::String(s)) => s.clone(),
            Ok(value) => value.to_string(),
            Err(e) => format!("Error: {e}"),
        }
    }
}
