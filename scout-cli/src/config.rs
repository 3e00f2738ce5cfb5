//! Runtime configuration shared by both programs.
//!
//! Values come from command-line flags (which fall back to `SCOUT_PROVIDER`
//! and `SCOUT_MODEL`) and from the environment:
//!
//! | Variable             | Meaning                         | Default     |
//! |----------------------|---------------------------------|-------------|
//! | `SCOUT_PROVIDER`     | `anthropic` or `openai`         | `anthropic` |
//! | `SCOUT_MODEL`        | model override                  | provider's  |
//! | `SCOUT_TEMPERATURE`  | sampling temperature            | `0`         |
//! | `SCOUT_TIMEOUT_SECS` | HTTP timeout in seconds         | `120`       |
//!
//! Provider credentials are read by the provider configs themselves
//! (`ANTHROPIC_API_KEY`, `OPENAI_API_KEY`, ...).

use std::fmt;
use std::sync::Arc;

use scout::agent::Agent;
use scout::chat::SharedChatProvider;
use scout::llms::{Anthropic, AnthropicConfig, OpenAI, OpenAIConfig};
use tracing::debug;

use crate::error::{CliError, Result};

/// Which hosted chat API to talk to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ProviderKind {
    /// Anthropic Messages API.
    #[default]
    Anthropic,
    /// OpenAI Chat Completions API.
    #[value(name = "openai")]
    OpenAI,
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Anthropic => "anthropic",
            Self::OpenAI => "openai",
        })
    }
}

/// Flags common to both programs.
#[derive(Debug, Clone, clap::Args)]
pub struct CommonArgs {
    /// Chat provider to use.
    #[arg(long, env = "SCOUT_PROVIDER", value_enum, default_value_t = ProviderKind::Anthropic)]
    pub provider: ProviderKind,

    /// Model to use instead of the provider default.
    #[arg(long, env = "SCOUT_MODEL")]
    pub model: Option<String>,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Fully resolved settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Selected provider.
    pub provider: ProviderKind,
    /// Model override.
    pub model: Option<String>,
    /// Sampling temperature.
    pub temperature: f32,
    /// HTTP timeout override in seconds.
    pub timeout_secs: Option<u64>,
}

impl Settings {
    /// Default sampling temperature.
    pub const DEFAULT_TEMPERATURE: f32 = 0.0;

    /// Resolve settings from parsed flags and the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Config`] if a numeric variable does not parse.
    pub fn from_args(args: &CommonArgs) -> Result<Self> {
        Self::resolve(args, |key| std::env::var(key).ok())
    }

    /// Resolve settings using `lookup` for environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Config`] if a numeric variable does not parse.
    pub fn resolve(args: &CommonArgs, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let temperature = match lookup("SCOUT_TEMPERATURE") {
            Some(raw) => raw.trim().parse::<f32>().map_err(|e| {
                CliError::config(format!("SCOUT_TEMPERATURE={raw:?}: {e}"))
            })?,
            None => Self::DEFAULT_TEMPERATURE,
        };

        let timeout_secs = lookup("SCOUT_TIMEOUT_SECS")
            .map(|raw| {
                raw.trim()
                    .parse::<u64>()
                    .map_err(|e| CliError::config(format!("SCOUT_TIMEOUT_SECS={raw:?}: {e}")))
            })
            .transpose()?;

        Ok(Self {
            provider: args.provider,
            model: args.model.clone().filter(|m| !m.is_empty()),
            temperature,
            timeout_secs,
        })
    }

    /// Build the configured provider from its environment variables.
    ///
    /// # Errors
    ///
    /// Returns an authentication error when the provider's API key is unset.
    pub fn build_provider(&self) -> Result<SharedChatProvider> {
        debug!(provider = %self.provider, timeout_secs = ?self.timeout_secs, "Building provider");
        let provider: SharedChatProvider = match self.provider {
            ProviderKind::Anthropic => {
                let mut config = AnthropicConfig::from_env()?;
                if let Some(secs) = self.timeout_secs {
                    config = config.with_timeout(secs);
                }
                Arc::new(Anthropic::new(config)?)
            }
            ProviderKind::OpenAI => {
                let mut config = OpenAIConfig::from_env()?;
                if let Some(secs) = self.timeout_secs {
                    config = config.with_timeout(secs);
                }
                Arc::new(OpenAI::new(config)?)
            }
        };
        Ok(provider)
    }

    /// Apply the model override and temperature to an agent.
    #[must_use]
    pub fn apply(&self, agent: Agent) -> Agent {
        let agent = agent.temperature(self.temperature);
        match &self.model {
            Some(model) => agent.model(model),
            None => agent,
        }
    }
}
