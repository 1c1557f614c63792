//! Dispatcher error types.

use thiserror::Error;

/// Failure to deliver an outbound reply through the gateway.
#[derive(Debug, Error)]
#[error("send error: {0}")]
pub struct SendError(pub String);

/// Failure to pull plain text out of an uploaded document.
#[derive(Debug, Error)]
#[error("extraction error: {0}")]
pub struct ExtractError(pub String);

/// Errors that can occur while handling one inbound event.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error(transparent)]
    Database(#[from] database::DatabaseError),

    #[error(transparent)]
    Chat(#[from] ai_chat::ChatError),

    #[error(transparent)]
    Report(#[from] ai_chat::ReportError),

    #[error("AI client is stopped")]
    ChatStopped,

    #[error(transparent)]
    Send(#[from] SendError),

    #[error(transparent)]
    Extract(#[from] ExtractError),
}

/// Result type for dispatch operations.
pub type Result<T> = std::result::Result<T, DispatchError>;
