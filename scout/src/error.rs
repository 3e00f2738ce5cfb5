//! Errors surfaced by scout.
//!
//! Provider failures are [`LlmError`]s and carry a [`LlmErrorKind`] so callers
//! can tell a bad credential from a transient outage. Tool failures are
//! [`ToolError`]s; the runner reports them back to the model instead of
//! aborting. Everything that ends a run is an [`Error`].

use std::fmt;

/// Shorthand for `Result<T, scout::Error>`.
pub type Result<T> = std::result::Result<T, Error>;

/// Why an agent run stopped without a final answer.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The provider call failed.
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    /// The agent cannot run as configured.
    #[error("Agent error: {0}")]
    Agent(String),

    /// The step budget ran out.
    #[error("Maximum steps ({max_steps}) reached without final answer")]
    MaxSteps {
        /// Configured step budget.
        max_steps: usize,
    },

    /// The final answer does not fit the declared output schema.
    #[error("Structured output '{schema}' could not be parsed: {message}")]
    StructuredOutput {
        /// Declared schema name.
        schema: String,
        /// Decoder message.
        message: String,
    },

    /// Writing the rendered result failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// An [`Error::Agent`] with the given message.
    #[must_use]
    pub fn agent(msg: impl Into<String>) -> Self {
        Self::Agent(msg.into())
    }

    /// An [`Error::MaxSteps`] for the given budget.
    #[must_use]
    pub const fn max_steps(max_steps: usize) -> Self {
        Self::MaxSteps { max_steps }
    }

    /// An [`Error::StructuredOutput`] for `schema`.
    #[must_use]
    pub fn structured_output(schema: impl Into<String>, message: impl Into<String>) -> Self {
        Self::StructuredOutput {
            schema: schema.into(),
            message: message.into(),
        }
    }

    /// Whether the provider rejected the credential.
    #[must_use]
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Llm(e) if e.kind == LlmErrorKind::Auth)
    }
}

/// Coarse classification of provider failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum LlmErrorKind {
    /// Missing or rejected API key.
    Auth,
    /// HTTP 429 or a provider rate-limit error.
    RateLimited,
    /// The reply could not be decoded.
    ResponseFormat,
    /// Transport failure or timeout.
    Network,
    /// Non-success status with an unrecognised body.
    HttpStatus,
    /// An error object returned by the provider.
    Provider,
    /// Local setup failure, such as building the HTTP client.
    Internal,
}

/// A failed call to a chat provider.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct LlmError {
    /// Failure class.
    pub kind: LlmErrorKind,
    /// Provider that produced the failure, when known.
    pub provider: Option<String>,
    /// Human-readable detail.
    pub message: String,
    /// Provider error code or HTTP status.
    pub code: Option<String>,
}

impl LlmError {
    fn build(
        kind: LlmErrorKind,
        provider: Option<String>,
        message: String,
        code: Option<String>,
    ) -> Self {
        Self {
            kind,
            provider,
            message,
            code,
        }
    }

    /// The provider refused the credential, or none was configured.
    #[must_use]
    pub fn auth(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::build(LlmErrorKind::Auth, Some(provider.into()), message.into(), None)
    }

    /// The provider throttled the request.
    #[must_use]
    pub fn rate_limited(provider: impl Into<String>) -> Self {
        Self::build(
            LlmErrorKind::RateLimited,
            Some(provider.into()),
            "rate limited by provider".into(),
            None,
        )
    }

    /// The reply body did not have the expected shape.
    #[must_use]
    pub fn response_format(expected: impl Into<String>, got: impl Into<String>) -> Self {
        Self::build(
            LlmErrorKind::ResponseFormat,
            None,
            format!("expected {}, got {}", expected.into(), got.into()),
            None,
        )
    }

    /// The request never produced a reply.
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::build(LlmErrorKind::Network, None, message.into(), None)
    }

    /// A non-success status whose body could not be classified.
    #[must_use]
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::build(
            LlmErrorKind::HttpStatus,
            None,
            format!("HTTP {status}: {}", body.into()),
            Some(status.to_string()),
        )
    }

    /// An error object reported by the provider, with its code.
    #[must_use]
    pub fn provider_code(
        provider: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::build(
            LlmErrorKind::Provider,
            Some(provider.into()),
            message.into(),
            Some(code.into()),
        )
    }

    /// A local failure before any request was sent.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::build(LlmErrorKind::Internal, None, message.into(), None)
    }
}

impl fmt::Display for LlmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.provider {
            Some(provider) => write!(f, "[{provider}] {}", self.message)?,
            None => f.write_str(&self.message)?,
        }
        match &self.code {
            Some(code) => write!(f, " (code: {code})"),
            None => Ok(()),
        }
    }
}

impl std::error::Error for LlmError {}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        let message = if err.is_timeout() {
            "request timed out".to_owned()
        } else if err.is_connect() {
            format!("connection failed: {err}")
        } else {
            err.to_string()
        };
        Self::network(message)
    }
}

/// A tool invocation that did not produce a result.
#[derive(Debug, Clone, thiserror::Error)]
#[non_exhaustive]
pub enum ToolError {
    /// The tool ran and failed.
    #[error("Execution error: {0}")]
    Execution(String),

    /// The arguments did not match the tool's parameter schema.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),
}

impl ToolError {
    /// A [`ToolError::Execution`] with the given message.
    #[must_use]
    pub fn execution(msg: impl Into<String>) -> Self {
        Self::Execution(msg.into())
    }
}

impl From<serde_json::Error> for ToolError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidArguments(err.to_string())
    }
}
