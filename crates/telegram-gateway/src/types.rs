//! Bot API wire types, limited to the fields the bot reads.

use bot_core::{Callback, DocumentRef, GatewayEvent, MenuMarkup, TextMessage};
use serde::{Deserialize, Serialize};

/// Envelope every Bot API method answers with.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    pub description: Option<String>,
}

/// The bot's own identity, from `getMe`.
#[derive(Debug, Clone, Deserialize)]
pub struct BotProfile {
    pub id: i64,
    pub username: Option<String>,
}

/// One long-poll update.
#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<Message>,
    #[serde(default)]
    pub callback_query: Option<CallbackQuery>,
}

impl Update {
    /// Convert into the transport-agnostic event the dispatcher takes.
    /// `None` for update kinds the bot does not subscribe to.
    pub fn into_event(self) -> Option<GatewayEvent> {
        if let Some(message) = self.message {
            return Some(GatewayEvent::Text(TextMessage {
                chat_id: message.chat.id,
                text: message.text.unwrap_or_default(),
                document: message.document.map(|document| DocumentRef {
                    file_id: document.file_id,
                    file_name: document.file_name,
                }),
            }));
        }

        if let Some(callback) = self.callback_query {
            let chat_id = callback.message?.chat.id;
            return Some(GatewayEvent::Callback(Callback {
                id: callback.id,
                chat_id,
                payload: callback.data.unwrap_or_default(),
            }));
        }

        None
    }
}

/// An inbound chat message.
#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub message_id: i64,
    pub chat: Chat,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub document: Option<Document>,
}

/// The conversation a message belongs to.
#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

/// An attached document.
#[derive(Debug, Clone, Deserialize)]
pub struct Document {
    pub file_id: String,
    #[serde(default)]
    pub file_name: Option<String>,
}

/// An inline keyboard button press.
#[derive(Debug, Clone, Deserialize)]
pub struct CallbackQuery {
    pub id: String,
    #[serde(default)]
    pub data: Option<String>,
    #[serde(default)]
    pub message: Option<Message>,
}

/// A downloadable file handle, from `getFile`.
#[derive(Debug, Clone, Deserialize)]
pub struct File {
    pub file_id: String,
    #[serde(default)]
    pub file_path: Option<String>,
}

/// Outbound inline keyboard.
#[derive(Debug, Clone, Serialize)]
pub struct InlineKeyboardMarkup {
    pub inline_keyboard: Vec<Vec<InlineKeyboardButton>>,
}

/// One inline keyboard button carrying a callback payload.
#[derive(Debug, Clone, Serialize)]
pub struct InlineKeyboardButton {
    pub text: String,
    pub callback_data: String,
}

impl From<&MenuMarkup> for InlineKeyboardMarkup {
    fn from(markup: &MenuMarkup) -> Self {
        Self {
            inline_keyboard: markup
                .rows
                .iter()
                .map(|row| {
                    row.iter()
                        .map(|button| InlineKeyboardButton {
                            text: button.label.clone(),
                            callback_data: button.command.clone(),
                        })
                        .collect()
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bot_core::{Command, MenuButton};

    #[test]
    fn test_message_update_into_event() {
        let update: Update = serde_json::from_str(
            r#"{
                "update_id": 10,
                "message": {
                    "message_id": 1,
                    "chat": { "id": 42 },
                    "text": "/start"
                }
            }"#,
        )
        .unwrap();

        assert_eq!(update.into_event(), Some(GatewayEvent::text(42, "/start")));
    }

    #[test]
    fn test_document_update_into_event() {
        let update: Update = serde_json::from_str(
            r#"{
                "update_id": 11,
                "message": {
                    "message_id": 2,
                    "chat": { "id": 42 },
                    "document": { "file_id": "f1", "file_name": "results.pdf" }
                }
            }"#,
        )
        .unwrap();

        match update.into_event() {
            Some(GatewayEvent::Text(message)) => {
                assert_eq!(message.text, "");
                let document = message.document.unwrap();
                assert_eq!(document.file_id, "f1");
                assert_eq!(document.extension().as_deref(), Some(".pdf"));
            }
            other => panic!("expected text event, got {other:?}"),
        }
    }

    #[test]
    fn test_callback_update_into_event() {
        let update: Update = serde_json::from_str(
            r#"{
                "update_id": 12,
                "callback_query": {
                    "id": "cb9",
                    "data": "signUp",
                    "message": { "message_id": 3, "chat": { "id": 42 } }
                }
            }"#,
        )
        .unwrap();

        assert_eq!(
            update.into_event(),
            Some(GatewayEvent::callback(42, "cb9", "signUp"))
        );
    }

    #[test]
    fn test_markup_conversion_keeps_rows() {
        let markup = MenuMarkup::new()
            .row(vec![
                MenuButton::new("Анализы", Command::Analysis),
                MenuButton::new("Выйти", Command::Exit),
            ])
            .row(vec![MenuButton::new("Контакты", Command::Contacts)]);

        let keyboard = InlineKeyboardMarkup::from(&markup);
        assert_eq!(keyboard.inline_keyboard.len(), 2);
        assert_eq!(keyboard.inline_keyboard[0][1].callback_data, "exit");
        assert_eq!(keyboard.inline_keyboard[1][0].text, "Контакты");
    }
}
