//! Runner: the agent execution engine.
//!
//! The [`Runner`] drives an [`Agent`] through a bounded exchange with its model:
//!
//! 1. Build a request from the transcript, tool definitions and output schema
//! 2. Send it to the provider
//! 3. Classify the response into a [`NextStep`]
//! 4. Execute requested tool calls one after another, appending results
//! 5. Loop back to step 1, or finish with the final output
//!
//! The loop terminates when the model produces a final answer, an error
//! occurs, or the step limit is exceeded.

use futures::FutureExt;
use futures::future::BoxFuture;
use serde_json::Value;
use tracing::{Instrument, debug, error, info, info_span, warn};

use crate::chat::{ChatProvider, ChatRequest, ChatResponse, ToolChoice};
use crate::error::{Error, Result};
use crate::message::Message;
use crate::tool::{BoxedTool, ToolCallResult, ToolDefinition};
use crate::usage::Usage;

use super::config::{Agent, OutputStrategy};
use super::result::{
    NextStep, RunConfig, RunResult, StepInfo, ToolCallRecord, ToolCallRequest, UserInput,
};

/// Per-run mutable state, created by [`RunState::init`].
struct RunState<'a> {
    agent: &'a Agent,
    provider: &'a dyn ChatProvider,
    model: String,
    messages: Vec<Message>,
    step_history: Vec<StepInfo>,
    cumulative_usage: Usage,
    definitions: Vec<ToolDefinition>,
    strategy: Option<OutputStrategy>,
    max_steps: usize,
}

impl<'a> RunState<'a> {
    fn init(agent: &'a Agent, input: UserInput, config: RunConfig) -> Result<Self> {
        let provider = agent.provider.as_deref().ok_or_else(|| {
            Error::agent(format!(
                "Agent '{}' has no provider configured. Call .provider() before running.",
                agent.name
            ))
        })?;

        let model = if agent.model.is_empty() {
            provider.default_model().to_owned()
        } else {
            agent.model.clone()
        };

        let mut messages = Vec::new();
        if !agent.instructions.is_empty() {
            messages.push(Message::system(&agent.instructions));
        }
        messages.extend(input.into_messages());

        let strategy = agent
            .output_schema
            .as_ref()
            .map(|_| agent.output_strategy.resolve(provider.supports_json_mode()));

        let mut definitions: Vec<ToolDefinition> =
            agent.tools.iter().map(|t| t.definition()).collect();
        if strategy == Some(OutputStrategy::Tool)
            && let Some(schema) = &agent.output_schema
        {
            definitions.push(schema.to_tool_definition());
        }

        let tool_names: Vec<&str> = definitions.iter().map(|d| d.name.as_str()).collect();
        tracing::Span::current().record("agent.tools", tracing::field::debug(&tool_names));
        debug!(
            agent = %agent.name,
            provider = provider.provider_name(),
            model = %model,
            strategy = ?strategy,
            "Run initialised",
        );

        Ok(Self {
            agent,
            provider,
            model,
            messages,
            step_history: Vec::new(),
            cumulative_usage: Usage::default(),
            definitions,
            strategy,
            max_steps: config.max_steps.unwrap_or(agent.max_steps),
        })
    }

    /// Name of the synthetic output tool, when the tool strategy is active.
    fn output_tool(&self) -> Option<&'a str> {
        match (self.strategy, &self.agent.output_schema) {
            (Some(OutputStrategy::Tool), Some(schema)) => Some(schema.name()),
            _ => None,
        }
    }

    fn build_request(&self) -> ChatRequest {
        let mut request = ChatRequest::with_messages(&self.model, self.messages.clone());
        if !self.definitions.is_empty() {
            let choice = if self.output_tool().is_some() {
                ToolChoice::Required
            } else {
                ToolChoice::Auto
            };
            request = request
                .tools(self.definitions.clone())
                .tool_choice(choice);
        }
        if self.strategy == Some(OutputStrategy::Native)
            && let Some(schema) = &self.agent.output_schema
        {
            request = request.response_format(schema.to_response_format());
        }
        if let Some(temperature) = self.agent.temperature {
            request = request.temperature(temperature);
        }
        if let Some(max_tokens) = self.agent.max_tokens {
            request = request.max_tokens(max_tokens);
        }
        request
    }

    fn accumulate_usage(&mut self, response: &ChatResponse) {
        if let Some(usage) = response.usage {
            self.cumulative_usage += usage;
        }
    }

    /// Process one response. Returns the finished result, or `None` to continue.
    async fn process_step(
        &mut self,
        step: usize,
        response: ChatResponse,
    ) -> Result<Option<RunResult>> {
        let next_step = Runner::classify_response(
            &response,
            self.agent.output_schema.as_ref().map(|s| s.name()),
            self.output_tool(),
        )?;

        self.messages.push(response.message.clone());

        match next_step {
            NextStep::FinalOutput { output } => {
                self.step_history.push(StepInfo {
                    step,
                    response,
                    tool_calls: Vec::new(),
                });

                tracing::Span::current().record("agent.result_steps", step);
                info!(
                    agent = %self.agent.name,
                    steps = step,
                    input_tokens = self.cumulative_usage.input_tokens,
                    output_tokens = self.cumulative_usage.output_tokens,
                    total_tokens = self.cumulative_usage.total(),
                    "Agent run completed",
                );

                Ok(Some(RunResult {
                    output,
                    messages: std::mem::take(&mut self.messages),
                    step_history: std::mem::take(&mut self.step_history),
                    usage: self.cumulative_usage,
                    steps: step,
                    agent_name: self.agent.name.clone(),
                    output_schema: self
                        .agent
                        .output_schema
                        .as_ref()
                        .map(|s| s.name().to_owned()),
                }))
            }
            NextStep::ToolCalls { calls } => {
                let tool_records = Runner::execute_tool_calls(
                    &calls,
                    &self.agent.tools,
                    self.output_tool(),
                    &mut self.messages,
                )
                .await;
                self.step_history.push(StepInfo {
                    step,
                    response,
                    tool_calls: tool_records,
                });
                Ok(None)
            }
        }
    }
}

/// Stateless execution engine that drives an [`Agent`] through its exchange.
///
/// All per-run state lives inside the run future, so the same agent can be
/// run any number of times.
#[derive(Debug, Clone, Copy)]
pub struct Runner;

impl Runner {
    /// Execute an agent run to completion.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Agent`] if no provider is configured on the agent,
    /// [`Error::MaxSteps`] if the step limit is exceeded,
    /// [`Error::StructuredOutput`] if a structured answer is not JSON, or
    /// propagates provider errors.
    pub fn run<'a>(
        agent: &'a Agent,
        input: impl Into<UserInput>,
        config: RunConfig,
    ) -> BoxFuture<'a, Result<RunResult>> {
        let input = input.into();
        let span = info_span!(
            "agent",
            agent.name = %agent.name,
            agent.model = %agent.model,
            gen_ai.system = "scout",
            agent.max_steps = config.max_steps.unwrap_or(agent.max_steps),
            agent.tools = tracing::field::Empty,
            agent.result_steps = tracing::field::Empty,
            error = tracing::field::Empty,
        );
        Self::run_inner(agent, input, config)
            .instrument(span)
            .boxed()
    }

    async fn run_inner(agent: &Agent, input: UserInput, config: RunConfig) -> Result<RunResult> {
        let mut state = RunState::init(agent, input, config)?;

        for step in 1..=state.max_steps {
            debug!(agent = %agent.name, step, "Starting step");

            let request = state.build_request();
            let response = state.provider.chat(&request).await.map_err(|e| {
                error!(error = %e, agent = %agent.name, step, "LLM call failed");
                tracing::Span::current().record("error", tracing::field::display(&e));
                e
            })?;

            debug!(
                step,
                model = response.model.as_deref().unwrap_or(state.model.as_str()),
                id = response.id.as_deref().unwrap_or_default(),
                stop_reason = ?response.stop_reason,
                "Model responded",
            );
            if response.stop_reason.is_truncated() {
                warn!(agent = %agent.name, step, "Response was cut off by the output token limit");
            }
            state.accumulate_usage(&response);

            let outcome = state.process_step(step, response).await.map_err(|e| {
                error!(error = %e, agent = %agent.name, step, "Step failed");
                tracing::Span::current().record("error", tracing::field::display(&e));
                e
            })?;
            if let Some(result) = outcome {
                return Ok(result);
            }
        }

        let err = Error::max_steps(state.max_steps);
        error!(error = %err, agent = %agent.name, max_steps = state.max_steps, "Max steps exceeded");
        tracing::Span::current().record("error", tracing::field::display(&err));
        Err(err)
    }

    /// Classify a model response into a [`NextStep`].
    ///
    /// `schema` names the declared output schema; when set, the final text is
    /// decoded as JSON. `output_tool` names the synthetic output tool. A turn
    /// that calls only that tool is the final answer; a turn that mixes it
    /// with other tools is treated as ordinary tool calls.
    fn classify_response(
        response: &ChatResponse,
        schema: Option<&str>,
        output_tool: Option<&str>,
    ) -> Result<NextStep> {
        if let Some(tool_calls) = response.tool_calls()
            && !tool_calls.is_empty()
        {
            if let Some(name) = output_tool
                && tool_calls.iter().all(|c| c.name() == name)
            {
                let output = tool_calls[0]
                    .arguments_value()
                    .map_err(|e| Error::structured_output(name, e.to_string()))?;
                return Ok(NextStep::FinalOutput { output });
            }
            let calls = tool_calls.iter().map(ToolCallRequest::from).collect();
            return Ok(NextStep::ToolCalls { calls });
        }

        let text = response.text().unwrap_or_default();
        let output = match schema {
            Some(name) => Self::decode_structured(name, text)?,
            None => Value::String(text.to_owned()),
        };
        Ok(NextStep::FinalOutput { output })
    }

    /// Decode a structured final answer, tolerating a surrounding code fence.
    fn decode_structured(schema: &str, text: &str) -> Result<Value> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(Error::structured_output(schema, "model returned no content"));
        }
        serde_json::from_str(Self::strip_fence(trimmed))
            .map_err(|e| Error::structured_output(schema, e.to_string()))
    }

    /// Remove a surrounding code fence and its info string, whatever the
    /// language tag or its case.
    fn strip_fence(text: &str) -> &str {
        let Some(rest) = text.strip_prefix("```") else {
            return text;
        };
        let rest = rest.strip_suffix("```").unwrap_or(rest);
        match rest.split_once('\n') {
            Some((info, body)) if !info.trim_start().starts_with(['{', '[']) => body.trim(),
            _ => rest.trim(),
        }
    }

    /// Execute tool calls sequentially in call order and append one tool
    /// message per call.
    ///
    /// A call to `output_tool` in this position shares its turn with other
    /// tools, so it is answered with a request to resend it alone rather than
    /// accepted as the final answer.
    async fn execute_tool_calls(
        calls: &[ToolCallRequest],
        tools: &[BoxedTool],
        output_tool: Option<&str>,
        messages: &mut Vec<Message>,
    ) -> Vec<ToolCallRecord> {
        let mut records = Vec::with_capacity(calls.len());
        for call in calls {
            let record = Self::execute_single_tool(call, tools, output_tool).await;
            messages.push(Message::tool(&record.id, &record.result));
            records.push(record);
        }
        records
    }

    async fn execute_single_tool(
        call: &ToolCallRequest,
        tools: &[BoxedTool],
        output_tool: Option<&str>,
    ) -> ToolCallRecord {
        let tool_span = info_span!(
            "tool",
            tool.name = %call.name,
            tool.id = %call.id,
            tool.input = %call.arguments,
            tool.output = tracing::field::Empty,
            tool.success = tracing::field::Empty,
            error = tracing::field::Empty,
        );

        async {
            let (text, success) = if output_tool == Some(call.name.as_str()) {
                debug!(tool = %call.name, "Final answer sent alongside other tool calls");
                (
                    format!(
                        "Answer not recorded: call {} again on its own once the other tool results are in.",
                        call.name
                    ),
                    false,
                )
            } else {
                match tools.iter().find(|t| t.name() == call.name) {
                    Some(tool) => Self::dispatch_tool(tool, call).await,
                    None => {
                        warn!(tool = %call.name, "Tool not found");
                        (format!("Tool '{}' not found", call.name), false)
                    }
                }
            };

            let current = tracing::Span::current();
            current.record("tool.success", success);
            current.record("tool.output", text.as_str());
            if !success {
                current.record("error", text.as_str());
            }

            ToolCallRecord {
                id: call.id.clone(),
                name: call.name.clone(),
                arguments: call.arguments.clone(),
                result: text,
                success,
            }
        }
        .instrument(tool_span)
        .await
    }

    /// Dispatch a tool call via the [`DynTool`](crate::tool::DynTool) interface.
    async fn dispatch_tool(tool: &BoxedTool, call: &ToolCallRequest) -> (String, bool) {
        let result = match tool.call_json(call.arguments.clone()).await {
            Ok(value) => ToolCallResult::success(&call.id, &call.name, value),
            Err(e) => {
                warn!(tool = %call.name, error = %e, "Tool execution failed");
                ToolCallResult::failure(&call.id, &call.name, e)
            }
        };
        (result.to_string_for_llm(), result.is_success())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::message::ToolCall;

    #[test]
    fn plain_text_is_final() {
        let resp = ChatResponse::from_text("hello");
        let next = Runner::classify_response(&resp, None, None).unwrap();
        assert_eq!(
            next,
            NextStep::FinalOutput {
                output: Value::String("hello".into())
            }
        );
    }

    #[test]
    fn structured_text_is_decoded() {
        let resp = ChatResponse::from_text(r#"{"topic":"Java"}"#);
        let next = Runner::classify_response(&resp, Some("R"), None).unwrap();
        assert_eq!(
            next,
            NextStep::FinalOutput {
                output: serde_json::json!({"topic": "Java"})
            }
        );
    }

    #[test]
    fn structured_text_in_fence_is_decoded() {
        let resp = ChatResponse::from_text("```json\n{\"topic\":\"Java\"}\n```");
        let next = Runner::classify_response(&resp, Some("R"), None).unwrap();
        assert!(matches!(next, NextStep::FinalOutput { output } if output["topic"] == "Java"));
    }

    #[test]
    fn fence_info_string_is_ignored() {
        for text in [
            "```JSON\n{\"topic\":\"Java\"}\n```",
            "```\n{\"topic\":\"Java\"}\n```",
            "```{\"topic\":\"Java\"}```",
        ] {
            let resp = ChatResponse::from_text(text);
            let next = Runner::classify_response(&resp, Some("R"), None).unwrap();
            assert!(
                matches!(next, NextStep::FinalOutput { ref output } if output["topic"] == "Java"),
                "{text:?} gave {next:?}"
            );
        }
    }

    #[test]
    fn structured_non_json_fails() {
        let resp = ChatResponse::from_text("Java is a language.");
        let err = Runner::classify_response(&resp, Some("R"), None).unwrap_err();
        assert!(matches!(err, Error::StructuredOutput { ref schema, .. } if schema == "R"));
    }

    #[test]
    fn structured_empty_fails() {
        let resp = ChatResponse::from_text("  ");
        let err = Runner::classify_response(&resp, Some("R"), None).unwrap_err();
        assert!(err.to_string().contains("no content"));
    }

    #[test]
    fn tool_calls_are_classified() {
        let resp = ChatResponse::from_tool_calls(vec![ToolCall::function(
            "c1",
            "get_capital",
            r#"{"country":"France"}"#,
        )]);
        let next = Runner::classify_response(&resp, Some("R"), Some("R")).unwrap();
        match next {
            NextStep::ToolCalls { calls } => {
                assert_eq!(calls.len(), 1);
                assert_eq!(calls[0].name, "get_capital");
                assert_eq!(calls[0].arguments["country"], "France");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn output_tool_call_is_final() {
        let resp = ChatResponse::from_tool_calls(vec![ToolCall::function(
            "c1",
            "R",
            r#"{"topic":"Java","summary":"A language."}"#,
        )]);
        let next = Runner::classify_response(&resp, Some("R"), Some("R")).unwrap();
        assert!(matches!(next, NextStep::FinalOutput { output } if output["summary"] == "A language."));
    }

    #[test]
    fn output_tool_mixed_with_other_tools_is_not_final() {
        let resp = ChatResponse::from_tool_calls(vec![
            ToolCall::function("c1", "get_capital", r#"{"country":"France"}"#),
            ToolCall::function("c2", "R", r#"{"topic":"Paris"}"#),
        ]);
        let next = Runner::classify_response(&resp, Some("R"), Some("R")).unwrap();
        match next {
            NextStep::ToolCalls { calls } => {
                let names: Vec<&str> = calls.iter().map(|c| c.name.as_str()).collect();
                assert_eq!(names, ["get_capital", "R"]);
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[tokio::test]
    async fn mixed_output_tool_call_is_answered_without_finishing() {
        let mut messages = Vec::new();
        let calls = vec![ToolCallRequest {
            id: "c2".into(),
            name: "R".into(),
            arguments: serde_json::json!({"topic": "Paris"}),
        }];
        let records = Runner::execute_tool_calls(&calls, &[], Some("R"), &mut messages).await;
        assert!(!records[0].success);
        assert!(records[0].result.starts_with("Answer not recorded: call R again"));
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].tool_call_id.as_deref(), Some("c2"));
    }

    #[test]
    fn output_tool_with_bad_arguments_fails() {
        let resp = ChatResponse::from_tool_calls(vec![ToolCall::function("c1", "R", "{nope")]);
        let err = Runner::classify_response(&resp, Some("R"), Some("R")).unwrap_err();
        assert!(matches!(err, Error::StructuredOutput { .. }));
    }

    #[tokio::test]
    async fn unknown_tool_yields_error_message() {
        let mut messages = Vec::new();
        let calls = vec![ToolCallRequest {
            id: "c1".into(),
            name: "missing".into(),
            arguments: serde_json::json!({}),
        }];
        let records = Runner::execute_tool_calls(&calls, &[], None, &mut messages).await;
        assert_eq!(records.len(), 1);
        assert!(!records[0].success);
        assert_eq!(records[0].result, "Tool 'missing' not found");
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].tool_call_id.as_deref(), Some("c1"));
    }
}
