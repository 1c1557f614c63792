//! Inbound events delivered by the messaging gateway.

use serde::{Deserialize, Serialize};

/// Reference to a document attached to an inbound message.
///
/// The gateway resolves `file_id` to an actual download path on demand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRef {
    /// Gateway-side file identifier.
    pub file_id: String,
    /// Original file name as uploaded, if known.
    pub file_name: Option<String>,
}

impl DocumentRef {
    /// Extension of the uploaded file, including the leading dot,
    /// lowercased. `None` when the file name carries no extension.
    pub fn extension(&self) -> Option<String> {
        let name = self.file_name.as_deref()?;
        let dot = name.rfind('.')?;
        if dot == 0 || dot == name.len() - 1 {
            return None;
        }
        Some(name[dot..].to_lowercase())
    }
}

/// A free-text message from a conversation, optionally with a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextMessage {
    /// Stable conversation identifier (chat id).
    pub chat_id: i64,
    /// Raw message text. Empty for document-only messages.
    pub text: String,
    /// Attached document, if any.
    pub document: Option<DocumentRef>,
}

/// A callback fired by an inline menu button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Callback {
    /// Gateway-side callback identifier, used to acknowledge the press.
    pub id: String,
    /// Conversation the callback belongs to.
    pub chat_id: i64,
    /// Opaque payload attached to the pressed button.
    pub payload: String,
}

/// An inbound event from the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayEvent {
    /// A text message (possibly with an attached document).
    Text(TextMessage),
    /// An inline menu callback.
    Callback(Callback),
}

impl GatewayEvent {
    /// Conversation identifier the event belongs to.
    pub fn chat_id(&self) -> i64 {
        match self {
            Self::Text(message) => message.chat_id,
            Self::Callback(callback) => callback.chat_id,
        }
    }

    /// Build a plain text event.
    pub fn text(chat_id: i64, text: impl Into<String>) -> Self {
        Self::Text(TextMessage {
            chat_id,
            text: text.into(),
            document: None,
        })
    }

    /// Build a callback event.
    pub fn callback(chat_id: i64, id: impl Into<String>, payload: impl Into<String>) -> Self {
        Self::Callback(Callback {
            id: id.into(),
            chat_id,
            payload: payload.into(),
        })
    }
}
