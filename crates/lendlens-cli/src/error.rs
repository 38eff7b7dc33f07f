//! Error types for the CLI application.

use lendlens_analyzer::{AnalyzerError, FlowError};
use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Document could not be analyzed
    #[error("{0}")]
    Analyzer(#[from] AnalyzerError),

    /// Flow rejected the operation
    #[error("{0}")]
    Flow(#[from] FlowError),

    /// Provider could not be built
    #[error("LLM error: {0}")]
    Llm(#[from] lendlens_llm::LlmError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Operation not permitted
    #[error("Operation not permitted: {0}")]
    NotPermitted(String),

    /// No API key from flag, environment, or profile
    #[error("No API key configured. Pass --api-key, set LENDLENS_API_KEY or GEMINI_API_KEY, or add api_key to the profile.")]
    MissingApiKey,
}

impl CliError {
    /// Provider or parser detail hidden behind the user-facing message
    pub fn reason(&self) -> Option<&str> {
        match self {
            CliError::Analyzer(err) | CliError::Flow(FlowError::Analyzer(err)) => err.reason(),
            _ => None,
        }
    }
}
