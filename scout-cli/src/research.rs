//! The research-assistant agent.

use scout::agent::{Agent, RunConfig};
use scout::chat::SharedChatProvider;
use tracing::info;

use crate::records::ResearchResponse;

/// Question used when none is given on the command line.
pub const DEFAULT_QUESTION: &str = "what is java programming language?";

/// System prompt of the research agent.
pub const INSTRUCTIONS: &str = "You are a research assistant.";

/// Build the research agent. It has no tools.
#[must_use]
pub fn agent(provider: SharedChatProvider) -> Agent {
    Agent::new("research")
        .instructions(INSTRUCTIONS)
        .provider(provider)
        .output_type::<ResearchResponse>()
}

/// Ask `agent` a question and return the decoded answer.
///
/// # Errors
///
/// Propagates provider, step-limit and structured-output errors from the run.
pub async fn run(agent: &Agent, question: &str) -> scout::Result<ResearchResponse> {
    let answer = agent
        .run_structured::<ResearchResponse>(question, RunConfig::default())
        .await?;
    info!(topic = %answer.value.topic, steps = answer.run.steps, "Research answer ready");
    Ok(answer.value)
}
