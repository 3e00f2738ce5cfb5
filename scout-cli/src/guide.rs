//! The city-guide agent.

use scout::agent::{Agent, RunConfig};
use scout::chat::SharedChatProvider;
use tracing::{info, warn};

use crate::capital::GetCapital;
use crate::records::CityGuide;

/// Country used when none is given on the command line.
pub const DEFAULT_COUNTRY: &str = "France";

/// System prompt of the city-guide agent.
pub const INSTRUCTIONS: &str = "You are a concise city guide.\n\
Use tools to get the capital if needed.\n\
Return: 1–2 line summary + 4–6 famous places + 3–5 things to do.";

/// The one-shot user message for `country`.
#[must_use]
pub fn prompt(country: &str) -> String {
    format!("City guide for the capital of {country}.")
}

/// Build the city-guide agent: instructions, the capital lookup tool and a
/// [`CityGuide`] output schema.
#[must_use]
pub fn agent(provider: SharedChatProvider) -> Agent {
    Agent::new("city-guide")
        .instructions(INSTRUCTIONS)
        .provider(provider)
        .tool(Box::new(GetCapital))
        .output_type::<CityGuide>()
}

/// Run `agent` for `country` and return the decoded guide.
///
/// Unmet length hints are logged, never fatal.
///
/// # Errors
///
/// Propagates provider, step-limit and structured-output errors from the run.
pub async fn run(agent: &Agent, country: &str) -> scout::Result<CityGuide> {
    let answer = agent
        .run_structured::<CityGuide>(prompt(country), RunConfig::default())
        .await?;

    for note in answer.value.advisories() {
        warn!(country, "{note}");
    }
    info!(
        country,
        capital = %answer.value.capital,
        steps = answer.run.steps,
        tool_calls = answer.run.tool_calls().count(),
        "City guide ready",
    );
    Ok(answer.value)
}
