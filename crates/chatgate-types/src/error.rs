use thiserror::Error;

/// Errors raised while validating or running a chat turn.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("prompt must not be empty")]
    EmptyPrompt,

    #[error("message content must not be empty")]
    EmptyMessage,

    #[error("invalid session id: {0}")]
    InvalidSession(String),

    #[error("session not found: {0}")]
    SessionNotFound(String),

    #[error("session limit of {limit} reached")]
    TooManySessions { limit: usize },

    #[error("completion failed: {0}")]
    Completion(#[from] crate::llm::LlmError),
}

/// Errors raised when a configuration value is out of range.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{field} must not be empty")]
    Empty { field: &'static str },

    #[error("{field} out of range: {value} (expected {expected})")]
    OutOfRange {
        field: &'static str,
        value: String,
        expected: &'static str,
    },
}
