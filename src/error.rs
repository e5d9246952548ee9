//! Error types for delve.

use crate::crew::CrewError;
use crate::llm::LlmError;

/// Top-level error type for the research pipelines.
#[derive(Debug, thiserror::Error)]
pub enum DelveError {
    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// Language model request error.
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    /// Crew construction or execution error.
    #[error("crew error: {0}")]
    Crew(#[from] CrewError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, DelveError>;
