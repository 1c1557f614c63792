//! Outbound reply seam between the dispatcher and the gateway.

use async_trait::async_trait;
use bot_core::{DocumentRef, MenuMarkup};
use tracing::debug;

use crate::error::SendError;

/// How the dispatcher talks back through the messaging gateway.
///
/// The gateway binary implements this over its transport; tests swap
/// in a recording implementation.
#[async_trait]
pub trait ReplySender: Send + Sync {
    /// Send a plain text reply.
    async fn send_text(&self, chat_id: i64, text: &str) -> Result<(), SendError>;

    /// Send a text reply with an attached menu.
    async fn send_menu(
        &self,
        chat_id: i64,
        text: &str,
        menu: &MenuMarkup,
    ) -> Result<(), SendError>;

    /// Acknowledge a pressed menu button.
    async fn answer_callback(&self, callback_id: &str, text: &str) -> Result<(), SendError>;

    /// Fetch the raw bytes of an uploaded document.
    async fn download_document(&self, document: &DocumentRef) -> Result<Vec<u8>, SendError>;
}

/// A sender that logs and discards everything. Useful for dry runs.
#[derive(Debug, Default)]
pub struct NoOpSender;

#[async_trait]
impl ReplySender for NoOpSender {
    async fn send_text(&self, chat_id: i64, text: &str) -> Result<(), SendError> {
        debug!(chat_id, text, "NoOpSender: discarding text");
        Ok(())
    }

    async fn send_menu(
        &self,
        chat_id: i64,
        text: &str,
        _menu: &MenuMarkup,
    ) -> Result<(), SendError> {
        debug!(chat_id, text, "NoOpSender: discarding menu");
        Ok(())
    }

    async fn answer_callback(&self, callback_id: &str, text: &str) -> Result<(), SendError> {
        debug!(callback_id, text, "NoOpSender: discarding callback answer");
        Ok(())
    }

    async fn download_document(&self, document: &DocumentRef) -> Result<Vec<u8>, SendError> {
        debug!(file_id = %document.file_id, "NoOpSender: nothing to download");
        Ok(Vec::new())
    }
}
