//! Bot entry point: wires the gateway, the dispatcher and the stores
//! together and runs the long-poll loop until a shutdown signal.

use std::sync::Arc;
use std::time::Duration;

use ai_chat::ChatClient;
use async_trait::async_trait;
use bot_core::{DocumentRef, MenuMarkup};
use database::Database;
use dispatcher::{Dispatcher, PlainTextExtractor, ReplySender, SendError};
use session_registry::SessionRegistry;
use telegram_gateway::{GatewayConfig, TelegramClient, UpdatePoller};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Bridges the dispatcher's reply seam onto the Bot API client.
struct TelegramSender {
    client: TelegramClient,
}

#[async_trait]
impl ReplySender for TelegramSender {
    async fn send_text(&self, chat_id: i64, text: &str) -> Result<(), SendError> {
        self.client
            .send_message(chat_id, text, None)
            .await
            .map_err(|e| SendError(e.to_string()))
    }

    async fn send_menu(
        &self,
        chat_id: i64,
        text: &str,
        menu: &MenuMarkup,
    ) -> Result<(), SendError> {
        self.client
            .send_message(chat_id, text, Some(menu))
            .await
            .map_err(|e| SendError(e.to_string()))
    }

    async fn answer_callback(&self, callback_id: &str, text: &str) -> Result<(), SendError> {
        self.client
            .answer_callback_query(callback_id, text)
            .await
            .map_err(|e| SendError(e.to_string()))
    }

    async fn download_document(&self, document: &DocumentRef) -> Result<Vec<u8>, SendError> {
        self.client
            .download_document(&document.file_id)
            .await
            .map_err(|e| SendError(e.to_string()))
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Missing secrets are fatal at startup.
    let gateway_config = GatewayConfig::from_env()?;
    let chat = Arc::new(ChatClient::from_env()?);
    let database_url = std::env::var("DATABASE_URL")
        .map_err(|_| "DATABASE_URL not set")?;

    let db = Database::connect(&database_url).await?;
    db.migrate().await?;

    chat.start();

    let registry = Arc::new(SessionRegistry::new());
    registry.start_sweeper().await;

    let client = TelegramClient::new(gateway_config)?;
    let me = client.get_me().await?;
    info!(username = ?me.username, "bot connected");

    let sender = Arc::new(TelegramSender {
        client: client.clone(),
    });
    let dispatcher = Arc::new(Dispatcher::new(
        db.clone(),
        Arc::clone(&chat),
        Arc::clone(&registry),
        sender,
        Arc::new(PlainTextExtractor),
    ));

    let mut poller = UpdatePoller::new(client);

    loop {
        tokio::select! {
            batch = poller.next_batch() => {
                match batch {
                    Ok(events) => {
                        for event in events {
                            let dispatcher = Arc::clone(&dispatcher);
                            tokio::spawn(async move {
                                if let Err(error) = dispatcher.handle_event(event).await {
                                    error!(%error, "event handling failed");
                                }
                            });
                        }
                    }
                    Err(error) => {
                        error!(%error, "polling failed, retrying");
                        tokio::time::sleep(Duration::from_secs(5)).await;
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("shutdown signal received");
                break;
            }
        }
    }

    registry.shutdown().await;
    chat.stop();
    db.close().await;
    info!("bot stopped");

    Ok(())
}
