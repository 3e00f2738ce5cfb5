//! The capital lookup tool offered to the city-guide agent.

use async_trait::async_trait;
use schemars::JsonSchema;
use scout::ToolError;
use scout::tool::{Tool, parameters_schema_for};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Returned for every country not in the table.
pub const UNKNOWN: &str = "Unknown";

/// Look up a country's capital. Matching is exact and case-sensitive.
#[must_use]
pub fn capital_of(country: &str) -> &'static str {
    match country {
        "France" => "Paris",
        "India" => "New Delhi",
        "USA" => "Washington, D.C.",
        _ => UNKNOWN,
    }
}

/// Arguments accepted by [`GetCapital`].
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct GetCapitalArgs {
    /// Name of the country, e.g. "France".
    pub country: String,
}

/// Tool wrapper around [`capital_of`].
#[derive(Debug, Clone, Copy, Default)]
pub struct GetCapital;

#[async_trait]
impl Tool for GetCapital {
    const NAME: &'static str = "get_capital";
    type Args = GetCapitalArgs;
    type Output = String;
    type Error = ToolError;

    fn description(&self) -> String {
        "Return the capital of a country.".to_owned()
    }

    fn parameters_schema(&self) -> Value {
        parameters_schema_for::<GetCapitalArgs>()
    }

    async fn call(&self, args: Self::Args) -> Result<Self::Output, Self::Error> {
        Ok(capital_of(&args.country).to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_known_capitals() {
        assert_eq!(capital_of("France"), "Paris");
        assert_eq!(capital_of("India"), "New Delhi");
        assert_eq!(capital_of("USA"), "Washington, D.C.");
    }

    #[test]
    fn test_everything_else_is_unknown() {
        for country in ["UK", "", "france", "FRANCE", " France"] {
            assert_eq!(capital_of(country), UNKNOWN, "{country:?}");
        }
    }

    #[test]
    fn test_lookup_is_stable() {
        assert_eq!(capital_of("India"), capital_of("India"));
    }

    #[test]
    fn test_definition() {
        let def = GetCapital.definition();
        assert_eq!(def.name, "get_capital");
        assert_eq!(def.description, "Return the capital of a country.");
        assert_eq!(def.parameters["type"], "object");
        assert_eq!(def.parameters["properties"]["country"]["type"], "string");
        assert_eq!(def.parameters["required"], json!(["country"]));
    }

    #[tokio::test]
    async fn test_json_interface() {
        let out = GetCapital
            .call_json(json!({"country": "USA"}))
            .await
            .expect("call succeeds");
        assert_eq!(out, json!("Washington, D.C."));

        let out = GetCapital
            .call_json(Value::String(r#"{"country":"Spain"}"#.into()))
            .await
            .expect("string arguments are accepted");
        assert_eq!(out, json!("Unknown"));
    }

    #[tokio::test]
    async fn test_bad_arguments_are_rejected() {
        let err = GetCapital
            .call_json(json!({"nation": "France"}))
            .await
            .expect_err("missing field");
        assert!(matches!(err, ToolError::InvalidArguments(_)));
    }
}
