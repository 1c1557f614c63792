//! Configuration for the Telegram gateway.

use std::env;

use crate::error::GatewayError;

/// Default Bot API host.
pub const DEFAULT_API_URL: &str = "https://api.telegram.org";

/// Default long-poll timeout, in seconds.
pub const DEFAULT_POLL_TIMEOUT_SECS: u64 = 30;

/// Configuration for [`crate::TelegramClient`].
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Bot token issued by BotFather.
    pub token: String,
    /// Bot API host.
    pub api_url: String,
    /// Long-poll timeout passed to `getUpdates`, in seconds.
    pub poll_timeout_secs: u64,
}

impl GatewayConfig {
    /// Create a config with defaults around the given token.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            api_url: DEFAULT_API_URL.to_string(),
            poll_timeout_secs: DEFAULT_POLL_TIMEOUT_SECS,
        }
    }

    /// Create configuration from environment variables.
    ///
    /// Required environment variables:
    /// - `TELEGRAM_BOT_TOKEN` - bot token
    ///
    /// Optional environment variables:
    /// - `TELEGRAM_API_URL` - API host (default: https://api.telegram.org)
    /// - `TELEGRAM_POLL_TIMEOUT_SECS` - long-poll timeout (default: 30)
    pub fn from_env() -> Result<Self, GatewayError> {
        let token = env::var("TELEGRAM_BOT_TOKEN")
            .map_err(|_| GatewayError::Config("TELEGRAM_BOT_TOKEN not set".to_string()))?;

        let api_url =
            env::var("TELEGRAM_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        let poll_timeout_secs = env::var("TELEGRAM_POLL_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_POLL_TIMEOUT_SECS);

        Ok(Self {
            token,
            api_url,
            poll_timeout_secs,
        })
    }

    /// URL of a Bot API method.
    pub fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_url, self.token, method)
    }

    /// URL a `getFile` path downloads from.
    pub fn file_url(&self, file_path: &str) -> String {
        format!("{}/file/bot{}/{}", self.api_url, self.token, file_path)
    }
}
