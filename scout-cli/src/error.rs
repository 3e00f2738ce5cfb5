//! Error type for the command-line programs.

/// Result type for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors surfaced by the `city-guide` and `research` programs.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Failure inside the agent runtime, a provider or output rendering.
    #[error(transparent)]
    Scout(#[from] scout::Error),

    /// A configuration value could not be used.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl CliError {
    /// Create a configuration error.
    #[must_use]
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

impl From<scout::LlmError> for CliError {
    fn from(err: scout::LlmError) -> Self {
        Self::Scout(err.into())
    }
}
