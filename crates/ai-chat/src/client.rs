//! DeepSeek chat client.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use reqwest::Client;
use tracing::{debug, info, warn};

use crate::api_types::{ApiError, ChatCompletionRequest, ChatCompletionResponse, ChatMessage};
use crate::config::ChatConfig;
use crate::error::{ChatError, Result};

/// Document extensions the bot accepts for decoding.
pub const SUPPORTED_EXTENSIONS: &[&str] = &[".pdf"];

/// Client for the DeepSeek chat completions API.
///
/// The client starts switched off; an administrator toggles it at
/// runtime. While off, both send methods return `Ok(None)` without
/// touching the network. Total token usage is accumulated for the
/// statistics screen.
pub struct ChatClient {
    client: Client,
    config: ChatConfig,
    running: AtomicBool,
    spent_tokens: AtomicU64,
}

impl ChatClient {
    /// Create a new client with the given configuration.
    pub fn new(config: ChatConfig) -> Result<Self> {
        let client = Client::builder().build().map_err(|e| {
            ChatError::Configuration(format!("Failed to create HTTP client: {}", e))
        })?;

        info!(model = %config.model, "chat client initialized");

        Ok(Self {
            client,
            config,
            running: AtomicBool::new(false),
            spent_tokens: AtomicU64::new(0),
        })
    }

    /// Create a client from environment variables.
    ///
    /// See [`ChatConfig::from_env`] for the variables involved.
    pub fn from_env() -> Result<Self> {
        Self::new(ChatConfig::from_env()?)
    }

    /// Whether the client currently accepts requests.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Switch the client on.
    pub fn start(&self) {
        self.running.store(true, Ordering::SeqCst);
        info!("AI client started");
    }

    /// Switch the client off. In-flight requests finish normally.
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
        info!("AI client stopped");
    }

    /// Total tokens consumed since startup.
    pub fn spent_tokens(&self) -> u64 {
        self.spent_tokens.load(Ordering::SeqCst)
    }

    /// Send a free-text prompt. Returns `Ok(None)` while the client is
    /// switched off. All choice contents are joined, one per line.
    pub async fn send_text(&self, prompt: &str) -> Result<Option<String>> {
        if !self.is_running() {
            return Ok(None);
        }

        let completion = self.chat_completion(prompt).await?;

        let mut reply = String::new();
        for choice in &completion.choices {
            reply.push_str(&choice.message.content);
            reply.push('\n');
        }

        Ok(Some(reply))
    }

    /// Send an assembled document prompt. Returns `Ok(None)` while the
    /// client is switched off; otherwise the first choice's content,
    /// which the caller runs through [`crate::parse_report`].
    pub async fn send_document_text(&self, prompt: &str) -> Result<Option<String>> {
        if !self.is_running() {
            return Ok(None);
        }

        let completion = self.chat_completion(prompt).await?;

        let content = completion
            .choices
            .first()
            .map(|choice| choice.message.content.clone())
            .unwrap_or_default();

        Ok(Some(content))
    }

    async fn chat_completion(&self, prompt: &str) -> Result<ChatCompletionResponse> {
        let request = ChatCompletionRequest {
            model: self.config.model.clone(),
            messages: vec![ChatMessage::user(prompt)],
        };

        debug!(model = %request.model, "sending chat completion request");

        let response = self
            .client
            .post(&self.config.api_url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .json(&request)
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "chat API returned an error");

            let message = match serde_json::from_str::<ApiError>(&body) {
                Ok(api_error) => api_error.error.message,
                Err(_) => body,
            };

            return Err(ChatError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| ChatError::MalformedResponse(e.to_string()))?;

        if let Some(ref usage) = completion.usage {
            let total = self
                .spent_tokens
                .fetch_add(usage.total_tokens, Ordering::SeqCst)
                + usage.total_tokens;
            debug!(
                request_tokens = usage.total_tokens,
                total_tokens = total,
                "token usage"
            );
        }

        Ok(completion)
    }
}
