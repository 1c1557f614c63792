//! Telegram Bot API gateway.
//!
//! Long-polls `getUpdates`, converts updates into
//! [`bot_core::GatewayEvent`]s, and sends replies and inline keyboards
//! back. Only the small slice of the Bot API the bot actually uses is
//! modeled.

mod client;
mod config;
mod error;
mod polling;
mod types;

pub use client::TelegramClient;
pub use config::{GatewayConfig, DEFAULT_API_URL, DEFAULT_POLL_TIMEOUT_SECS};
pub use error::GatewayError;
pub use polling::UpdatePoller;
pub use types::{
    ApiResponse, BotProfile, CallbackQuery, Chat, Document, File, InlineKeyboardButton,
    InlineKeyboardMarkup, Message, Update,
};
