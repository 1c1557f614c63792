//! Error types for the Telegram gateway.

use thiserror::Error;

/// Errors that can occur when talking to the Bot API.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered `ok: false`.
    #[error("API error: {0}")]
    Api(String),

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),
}
