//! Long-poll update cursor.

use bot_core::GatewayEvent;
use tracing::{debug, warn};

use crate::client::TelegramClient;
use crate::error::GatewayError;

/// Tracks the `getUpdates` offset so each update is delivered once.
#[derive(Debug)]
pub struct UpdatePoller {
    client: TelegramClient,
    offset: i64,
}

impl UpdatePoller {
    pub fn new(client: TelegramClient) -> Self {
        Self { client, offset: 0 }
    }

    /// Fetch the next batch of events. Blocks on the long poll until
    /// the server answers; an empty batch just means the poll timed
    /// out quietly.
    pub async fn next_batch(&mut self) -> Result<Vec<GatewayEvent>, GatewayError> {
        let updates = self.client.get_updates(self.offset).await?;

        let mut events = Vec::with_capacity(updates.len());
        for update in updates {
            self.offset = self.offset.max(update.update_id + 1);

            match update.into_event() {
                Some(event) => events.push(event),
                None => warn!("update of an unsubscribed kind, skipped"),
            }
        }

        if !events.is_empty() {
            debug!(count = events.len(), offset = self.offset, "updates received");
        }

        Ok(events)
    }
}
