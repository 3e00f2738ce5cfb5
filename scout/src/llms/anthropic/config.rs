//! Settings for the Messages API backend.

use crate::error::{LlmError, Result};

/// Where and how to reach the Anthropic Messages API.
#[derive(Debug, Clone)]
pub struct AnthropicConfig {
    /// Sent as `x-api-key`.
    pub api_key: String,
    /// API root; `/v1/messages` is appended.
    pub base_url: String,
    /// Model used when the agent does not name one.
    pub model: String,
    /// Sent as `anthropic-version`.
    pub api_version: String,
    /// `max_tokens` for requests that leave it unset. The API requires one.
    pub default_max_tokens: u32,
    /// Whole-request timeout.
    pub timeout_secs: u64,
}

impl AnthropicConfig {
    /// Public Anthropic endpoint.
    pub const DEFAULT_BASE_URL: &'static str = "https://api.anthropic.com";
    /// Model used when neither the agent nor `ANTHROPIC_MODEL` names one.
    pub const DEFAULT_MODEL: &'static str = "claude-sonnet-4-5-20250929";
    /// Pinned API version.
    pub const API_VERSION: &'static str = "2023-06-01";
    /// Fallback output token cap.
    pub const DEFAULT_MAX_TOKENS: u32 = 4096;
    /// Request timeout unless overridden.
    pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

    /// Defaults for everything except the key.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: Self::DEFAULT_BASE_URL.to_owned(),
            model: Self::DEFAULT_MODEL.to_owned(),
            api_version: Self::API_VERSION.to_owned(),
            default_max_tokens: Self::DEFAULT_MAX_TOKENS,
            timeout_secs: Self::DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Read `ANTHROPIC_API_KEY`, `ANTHROPIC_BASE_URL` and `ANTHROPIC_MODEL`
    /// from the process environment.
    ///
    /// # Errors
    ///
    /// An authentication error when `ANTHROPIC_API_KEY` is unset or empty.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`AnthropicConfig::from_env`], reading variables through `lookup`.
    ///
    /// # Errors
    ///
    /// An authentication error when `ANTHROPIC_API_KEY` is missing or empty.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let api_key = lookup("ANTHROPIC_API_KEY")
            .filter(|key| !key.is_empty())
            .ok_or_else(|| LlmError::auth("anthropic", "ANTHROPIC_API_KEY is not set"))?;

        let mut config = Self::new(api_key);
        if let Some(base_url) = lookup("ANTHROPIC_BASE_URL") {
            config.base_url = base_url;
        }
        if let Some(model) = lookup("ANTHROPIC_MODEL") {
            config.model = model;
        }
        Ok(config)
    }

    /// Replace the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AnthropicConfig::new("sk-ant-test");
        assert_eq!(config.base_url, "https://api.anthropic.com");
        assert_eq!(config.model, "claude-sonnet-4-5-20250929");
        assert_eq!(config.api_version, "2023-06-01");
        assert_eq!(config.default_max_tokens, 4096);
        assert_eq!(config.timeout_secs, 120);
    }

    #[test]
    fn test_lookup_overrides() {
        let config = AnthropicConfig::from_lookup(|key| match key {
            "ANTHROPIC_API_KEY" => Some("sk-ant-test".to_owned()),
            "ANTHROPIC_MODEL" => Some("claude-haiku-4-5".to_owned()),
            _ => None,
        })
        .expect("key is set");
        assert_eq!(config.model, "claude-haiku-4-5");
        assert_eq!(config.base_url, AnthropicConfig::DEFAULT_BASE_URL);
        assert_eq!(config.with_timeout(30).timeout_secs, 30);
    }

    #[test]
    fn test_missing_key_is_auth_error() {
        let err = AnthropicConfig::from_lookup(|_| None).expect_err("no key");
        assert!(err.is_auth());
    }
}
