use thiserror::Error;

use crate::llm::LlmError;

/// Errors loading or using persona data files.
#[derive(Debug, Error)]
pub enum PersonaError {
    #[error("profile file not found: {0}")]
    FileNotFound(String),

    #[error("profile parse error: {0}")]
    Parse(String),

    #[error("io error: {0}")]
    Io(String),
}

/// Errors loading news data.
#[derive(Debug, Error)]
pub enum NewsError {
    #[error("news file not found: {0}")]
    FileNotFound(String),

    #[error("news parse error: {0}")]
    Parse(String),

    #[error("io error: {0}")]
    Io(String),
}

/// Errors from the tool-calling loop.
#[derive(Debug, Error)]
pub enum AgentError {
    /// The model requested a function this deployment does not declare.
    /// Fatal for the request.
    #[error("unknown function call: '{0}'")]
    UnknownTool(String),

    #[error(transparent)]
    Llm(#[from] LlmError),
}
