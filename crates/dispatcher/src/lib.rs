//! Conversation engine for the analysis decoder bot.
//!
//! The [`Dispatcher`] resolves every inbound [`bot_core::GatewayEvent`]
//! to a session, feeds free text to the active workflow mode or matches
//! callbacks against the command table, and replies through a
//! [`ReplySender`]. Document uploads go through the
//! [`DocumentExtractor`] seam and the AI client.

mod dispatcher;
mod document;
mod error;
mod menus;
mod sender;
mod workflow;

pub use dispatcher::Dispatcher;
pub use document::{DocumentExtractor, PlainTextExtractor};
pub use error::{DispatchError, ExtractError, Result, SendError};
pub use menus::{analyses_menu, exit_menu, history_menu, manual_menu, start_menu};
pub use sender::{NoOpSender, ReplySender};
pub use workflow::{advance_wizard, parse_pressure, parse_temperature, WizardStep};
