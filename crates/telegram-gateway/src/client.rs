//! Bot API HTTP client.

use std::time::Duration;

use bot_core::MenuMarkup;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use tracing::debug;

use crate::config::GatewayConfig;
use crate::error::GatewayError;
use crate::types::{
    ApiResponse, BotProfile, File, InlineKeyboardMarkup, Update,
};

/// Client for the Telegram Bot API.
#[derive(Debug, Clone)]
pub struct TelegramClient {
    http: Client,
    config: GatewayConfig,
}

impl TelegramClient {
    /// Create a client. The HTTP timeout leaves headroom over the
    /// long-poll timeout so `getUpdates` is not cut off by our side.
    pub fn new(config: GatewayConfig) -> Result<Self, GatewayError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.poll_timeout_secs + 10))
            .build()?;

        Ok(Self { http, config })
    }

    /// Identify the bot account. Used as a startup connectivity check.
    pub async fn get_me(&self) -> Result<BotProfile, GatewayError> {
        self.call("getMe", &json!({})).await
    }

    /// Long-poll for the next batch of updates.
    pub async fn get_updates(&self, offset: i64) -> Result<Vec<Update>, GatewayError> {
        self.call(
            "getUpdates",
            &json!({
                "offset": offset,
                "timeout": self.config.poll_timeout_secs,
                "allowed_updates": ["message", "callback_query"],
            }),
        )
        .await
    }

    /// Send a text message, optionally with an inline keyboard.
    pub async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        menu: Option<&MenuMarkup>,
    ) -> Result<(), GatewayError> {
        let mut body = json!({
            "chat_id": chat_id,
            "text": text,
        });
        if let Some(menu) = menu {
            body["reply_markup"] = serde_json::to_value(InlineKeyboardMarkup::from(menu))
                .map_err(|e| GatewayError::Api(e.to_string()))?;
        }

        let _: serde_json::Value = self.call("sendMessage", &body).await?;
        Ok(())
    }

    /// Acknowledge a pressed inline button.
    pub async fn answer_callback_query(
        &self,
        callback_query_id: &str,
        text: &str,
    ) -> Result<(), GatewayError> {
        let _: serde_json::Value = self
            .call(
                "answerCallbackQuery",
                &json!({
                    "callback_query_id": callback_query_id,
                    "text": text,
                }),
            )
            .await?;
        Ok(())
    }

    /// Download an uploaded document's bytes.
    pub async fn download_document(&self, file_id: &str) -> Result<Vec<u8>, GatewayError> {
        let file: File = self.call("getFile", &json!({ "file_id": file_id })).await?;

        let file_path = file
            .file_path
            .ok_or_else(|| GatewayError::Api("getFile returned no file_path".to_string()))?;

        let bytes = self
            .http
            .get(self.config.file_url(&file_path))
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;

        debug!(file_id, size = bytes.len(), "document downloaded");
        Ok(bytes.to_vec())
    }

    async fn call<P: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: &str,
        params: &P,
    ) -> Result<T, GatewayError> {
        debug!(method, "Bot API call");

        let response: ApiResponse<T> = self
            .http
            .post(self.config.method_url(method))
            .json(params)
            .send()
            .await?
            .json()
            .await?;

        if !response.ok {
            return Err(GatewayError::Api(
                response
                    .description
                    .unwrap_or_else(|| format!("{method} failed")),
            ));
        }

        response
            .result
            .ok_or_else(|| GatewayError::Api(format!("{method} returned no result")))
    }
}
