//! Settings for the Chat Completions backend.

use crate::error::{LlmError, Result};

/// Where and how to reach an OpenAI-compatible endpoint.
#[derive(Debug, Clone)]
pub struct OpenAIConfig {
    /// Bearer token.
    pub api_key: String,
    /// API root including `/v1`; `/chat/completions` is appended.
    pub base_url: String,
    /// Model used when the agent does not name one.
    pub model: String,
    /// Sent as `OpenAI-Organization` when set.
    pub organization: Option<String>,
    /// Whole-request timeout.
    pub timeout_secs: u64,
}

impl OpenAIConfig {
    /// Public OpenAI endpoint.
    pub const DEFAULT_BASE_URL: &'static str = "https://api.openai.com/v1";
    /// Model used when neither the agent nor `OPENAI_MODEL` names one.
    pub const DEFAULT_MODEL: &'static str = "gpt-4o";
    /// Request timeout unless overridden.
    pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

    /// Defaults for everything except the key.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: Self::DEFAULT_BASE_URL.to_owned(),
            model: Self::DEFAULT_MODEL.to_owned(),
            organization: None,
            timeout_secs: Self::DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Read `OPENAI_API_KEY`, `OPENAI_BASE_URL`, `OPENAI_MODEL` and
    /// `OPENAI_ORGANIZATION` from the process environment.
    ///
    /// # Errors
    ///
    /// An authentication error when `OPENAI_API_KEY` is unset or empty.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`OpenAIConfig::from_env`], reading variables through `lookup`.
    ///
    /// # Errors
    ///
    /// An authentication error when `OPENAI_API_KEY` is missing or empty.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let api_key = lookup("OPENAI_API_KEY")
            .filter(|key| !key.is_empty())
            .ok_or_else(|| LlmError::auth("openai", "OPENAI_API_KEY is not set"))?;

        let mut config = Self::new(api_key);
        if let Some(base_url) = lookup("OPENAI_BASE_URL") {
            config.base_url = base_url;
        }
        if let Some(model) = lookup("OPENAI_MODEL") {
            config.model = model;
        }
        config.organization = lookup("OPENAI_ORGANIZATION");
        Ok(config)
    }

    /// Replace the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}
