//! End-to-end agent runs against the scripted provider.

#![allow(clippy::unwrap_used, clippy::panic, clippy::clone_on_ref_ptr)]

use std::sync::Arc;

use async_trait::async_trait;
use schemars::JsonSchema;
use scout::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

#[derive(Debug, Clone, Copy, Default)]
struct CapitalTool;

/// Arguments of the capital lookup.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
struct CapitalArgs {
    /// Country name.
    country: String,
}

#[async_trait]
impl Tool for CapitalTool {
    const NAME: &'static str = "get_capital";
    type Args = CapitalArgs;
    type Output = String;
    type Error = ToolError;

    fn description(&self) -> String {
        "Return the capital of a country.".to_owned()
    }

    fn parameters_schema(&self) -> Value {
        parameters_schema_for::<CapitalArgs>()
    }

    async fn call(&self, args: Self::Args) -> std::result::Result<Self::Output, Self::Error> {
        Ok(match args.country.as_str() {
            "France" => "Paris",
            "India" => "New Delhi",
            _ => "Unknown",
        }
        .to_owned())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
struct Guide {
    country: String,
    capital: String,
    summary: String,
}

fn guide_json() -> Value {
    json!({"country": "France", "capital": "Paris", "summary": "City of light."})
}

fn capital_call(id: &str, country: &str) -> ChatResponse {
    ChatResponse::from_tool_calls(vec![ToolCall::function(
        id,
        "get_capital",
        json!({ "country": country }).to_string(),
    )])
}

fn guide_agent(provider: Arc<MockProvider>) -> Agent {
    Agent::new("city-guide")
        .instructions("You are a concise city guide.")
        .provider(provider)
        .tool(Box::new(CapitalTool))
        .output_type::<Guide>()
}

#[tokio::test]
async fn test_tool_then_native_structured_answer() {
    let provider = Arc::new(
        MockProvider::new(vec![
            capital_call("call_1", "France").with_usage(Usage::new(10, 5)),
            ChatResponse::from_text(guide_json().to_string()).with_usage(Usage::new(20, 8)),
        ])
        .with_json_mode(true),
    );

    let answer = guide_agent(provider.clone())
        .run_structured::<Guide>("City guide for the capital of France.", RunConfig::default())
        .await
        .unwrap();

    assert_eq!(answer.value.capital, "Paris");
    assert_eq!(answer.run.steps, 2);
    assert_eq!(answer.run.usage, Usage::new(30, 13));

    let roles: Vec<Role> = answer.run.messages.iter().map(|m| m.role).collect();
    assert_eq!(
        roles,
        vec![Role::System, Role::User, Role::Assistant, Role::Tool, Role::Assistant]
    );
    let tool_msg = answer.run.tool_messages().next().unwrap();
    assert_eq!(tool_msg.text(), Some("Paris"));
    assert_eq!(tool_msg.tool_call_id.as_deref(), Some("call_1"));

    let requests = provider.requests().await;
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].model, "mock-model");
    assert_eq!(requests[0].tool_choice, Some(ToolChoice::Auto));
    let format = requests[0].response_format.as_ref().unwrap();
    assert_eq!(format.name, "Guide");
    assert!(format.strict);
    assert_eq!(requests[1].messages.len(), 4);
}

#[tokio::test]
async fn test_tool_strategy_final_answer_via_output_tool() {
    let provider = Arc::new(MockProvider::new(vec![
        capital_call("toolu_1", "France"),
        ChatResponse::from_tool_calls(vec![ToolCall::function(
            "toolu_2",
            "Guide",
            guide_json().to_string(),
        )]),
    ]));

    let answer = guide_agent(provider.clone())
        .run_structured::<Guide>("City guide for the capital of France.", RunConfig::default())
        .await
        .unwrap();
    assert_eq!(answer.value.country, "France");
    assert_eq!(answer.run.tool_calls().count(), 1);

    let requests = provider.requests().await;
    let first = &requests[0];
    assert!(first.response_format.is_none());
    assert_eq!(first.tool_choice, Some(ToolChoice::Required));
    let names: Vec<&str> = first
        .tools
        .as_ref()
        .unwrap()
        .iter()
        .map(|t| t.name.as_str())
        .collect();
    assert_eq!(names, vec!["get_capital", "Guide"]);
}

#[tokio::test]
async fn test_output_tool_beside_other_calls_waits_for_their_results() {
    let provider = Arc::new(MockProvider::new(vec![
        ChatResponse::from_tool_calls(vec![
            ToolCall::function("toolu_1", "get_capital", r#"{"country":"France"}"#),
            ToolCall::function(
                "toolu_2",
                "Guide",
                json!({"country": "France", "capital": "Lyon", "summary": "Guessed."}).to_string(),
            ),
        ]),
        ChatResponse::from_tool_calls(vec![ToolCall::function(
            "toolu_3",
            "Guide",
            guide_json().to_string(),
        )]),
    ]));

    let answer = guide_agent(provider.clone())
        .run_structured::<Guide>("City guide for the capital of France.", RunConfig::default())
        .await
        .unwrap();
    assert_eq!(answer.value.capital, "Paris");
    assert_eq!(answer.run.steps, 2);

    let records: Vec<(&str, bool)> = answer
        .run
        .tool_calls()
        .map(|r| (r.result.as_str(), r.success))
        .collect();
    assert_eq!(records[0], ("Paris", true));
    assert!(!records[1].1);
    assert!(records[1].0.contains("call Guide again on its own"));

    let requests = provider.requests().await;
    let answered: Vec<Option<&str>> = requests[1]
        .messages
        .iter()
        .filter(|m| m.role == Role::Tool)
        .map(|m| m.tool_call_id.as_deref())
        .collect();
    assert_eq!(answered, vec![Some("toolu_1"), Some("toolu_2")]);
}

#[tokio::test]
async fn test_plain_agent_returns_text() {
    let provider = Arc::new(MockProvider::new(vec![ChatResponse::from_text(
        "Java is a programming language.",
    )]));
    let agent = Agent::new("plain").provider(provider.clone());

    let result = agent.run("what is java?", RunConfig::default()).await.unwrap();
    assert_eq!(result.text(), Some("Java is a programming language."));
    assert_eq!(result.steps, 1);
    assert!(result.output_schema.is_none());

    let requests = provider.requests().await;
    assert!(requests[0].tools.is_none());
    assert!(requests[0].tool_choice.is_none());
    assert_eq!(requests[0].messages[0].role, Role::User);
}

#[tokio::test]
async fn test_unknown_tool_is_reported_to_model() {
    let provider = Arc::new(
        MockProvider::new(vec![
            ChatResponse::from_tool_calls(vec![ToolCall::function("c1", "get_weather", "{}")]),
            ChatResponse::from_text(guide_json().to_string()),
        ])
        .with_json_mode(true),
    );

    let result = guide_agent(provider)
        .run("City guide for the capital of France.", RunConfig::default())
        .await
        .unwrap();

    let record = result.tool_calls().next().unwrap();
    assert!(!record.success);
    assert_eq!(record.result, "Tool 'get_weather' not found");
    assert_eq!(
        result.tool_messages().next().unwrap().text(),
        Some("Tool 'get_weather' not found")
    );
}

#[tokio::test]
async fn test_tool_calls_run_in_call_order() {
    let provider = Arc::new(
        MockProvider::new(vec![
            ChatResponse::from_tool_calls(vec![
                ToolCall::function("a", "get_capital", r#"{"country":"India"}"#),
                ToolCall::function("b", "get_capital", r#"{"country":"Atlantis"}"#),
            ]),
            ChatResponse::from_text(guide_json().to_string()),
        ])
        .with_json_mode(true),
    );

    let result = guide_agent(provider)
        .run("City guide", RunConfig::default())
        .await
        .unwrap();
    let results: Vec<(&str, &str)> = result
        .tool_calls()
        .map(|r| (r.id.as_str(), r.result.as_str()))
        .collect();
    assert_eq!(results, vec![("a", "New Delhi"), ("b", "Unknown")]);
}

#[tokio::test]
async fn test_max_steps_exceeded() {
    let provider = Arc::new(MockProvider::new(vec![
        capital_call("c1", "France"),
        capital_call("c2", "France"),
        capital_call("c3", "France"),
    ]));

    let err = guide_agent(provider.clone())
        .run("loop", RunConfig::new().max_steps(2))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::MaxSteps { max_steps: 2 }));
    assert_eq!(provider.requests().await.len(), 2);
}

#[tokio::test]
async fn test_missing_field_is_structured_output_error() {
    let provider = Arc::new(
        MockProvider::new(vec![ChatResponse::from_text(
            r#"{"country": "France", "capital": "Paris"}"#,
        )])
        .with_json_mode(true),
    );

    let err = guide_agent(provider)
        .run_structured::<Guide>("City guide", RunConfig::default())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::StructuredOutput { ref schema, .. } if schema == "Guide"));
}

#[tokio::test]
async fn test_non_json_answer_is_structured_output_error() {
    let provider = Arc::new(
        MockProvider::new(vec![ChatResponse::from_text("Paris is lovely.")]).with_json_mode(true),
    );

    let err = guide_agent(provider)
        .run("City guide", RunConfig::default())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::StructuredOutput { .. }));
}

#[tokio::test]
async fn test_provider_error_propagates() {
    let provider = Arc::new(MockProvider::new(Vec::new()));
    let err = guide_agent(provider)
        .run("City guide", RunConfig::default())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Llm(_)));
}

#[tokio::test]
async fn test_missing_provider_is_agent_error() {
    let err = Agent::new("orphan")
        .run("hello", RunConfig::default())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Agent(_)));
}
