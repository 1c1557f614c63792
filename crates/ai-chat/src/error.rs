//! AI chat error types.

use thiserror::Error;

/// Errors that can occur while talking to the chat API.
#[derive(Debug, Error)]
pub enum ChatError {
    /// Missing or invalid configuration.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Network-level failure.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The API answered but the body could not be interpreted.
    #[error("malformed API response: {0}")]
    MalformedResponse(String),
}

/// Result type for chat operations.
pub type Result<T> = std::result::Result<T, ChatError>;
