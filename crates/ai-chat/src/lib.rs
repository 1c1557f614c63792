//! DeepSeek chat client for the analysis decoder bot.
//!
//! Wraps the chat completions API behind a runtime on/off switch and
//! parses the tagged document responses into [`MedicalReport`]s.
//!
//! ```rust,no_run
//! use ai_chat::ChatClient;
//!
//! # async fn run() -> Result<(), ai_chat::ChatError> {
//! let client = ChatClient::from_env()?;
//! client.start();
//! if let Some(reply) = client.send_text("Привет").await? {
//!     println!("{reply}");
//! }
//! # Ok(())
//! # }
//! ```

mod api_types;
mod client;
mod config;
mod error;
mod report;

pub use client::{ChatClient, SUPPORTED_EXTENSIONS};
pub use config::{ChatConfig, DEFAULT_API_URL, DEFAULT_MODEL};
pub use error::{ChatError, Result};
pub use report::{
    build_document_prompt, parse_report, MedicalReport, ReportError, DOCUMENT_INSTRUCTION,
    REJECTION_PHRASE,
};
