//! Configuration for the DeepSeek chat client.

use std::env;

use crate::error::ChatError;

/// Default chat completions endpoint.
pub const DEFAULT_API_URL: &str = "https://api.deepseek.com/v1/chat/completions";

/// Default model name.
pub const DEFAULT_MODEL: &str = "deepseek-chat";

/// Configuration for [`crate::ChatClient`].
#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// Chat completions endpoint.
    pub api_url: String,

    /// API key for authentication.
    pub api_key: String,

    /// Model name to use.
    pub model: String,
}

impl ChatConfig {
    /// Create configuration from environment variables.
    ///
    /// Required environment variables:
    /// - `DEEPSEEK_API_KEY` - API key for authentication
    ///
    /// Optional environment variables:
    /// - `DEEPSEEK_API_URL` - endpoint (default: https://api.deepseek.com/v1/chat/completions)
    /// - `DEEPSEEK_MODEL` - model name (default: deepseek-chat)
    pub fn from_env() -> Result<Self, ChatError> {
        let api_key = env::var("DEEPSEEK_API_KEY")
            .map_err(|_| ChatError::Configuration("DEEPSEEK_API_KEY not set".to_string()))?;

        let api_url =
            env::var("DEEPSEEK_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        let model = env::var("DEEPSEEK_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        Ok(Self {
            api_url,
            api_key,
            model,
        })
    }

    /// Build a config with defaults around the given key. Used in tests
    /// and by callers that manage their own configuration source.
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
        }
    }
}
