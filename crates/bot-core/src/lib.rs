//! Shared domain types for the analysis decoder bot.
//!
//! This crate defines the vocabulary the rest of the workspace speaks:
//!
//! - [`GatewayEvent`] / [`TextMessage`] / [`Callback`] - inbound events from
//!   the messaging gateway
//! - [`MenuMarkup`] / [`MenuButton`] - transport-agnostic menu rendering
//! - [`Command`] - the fixed callback command table
//! - [`Gender`] / [`RecordKind`] - profile and record classification

mod command;
mod event;
mod kinds;
mod menu;

pub use command::{Command, START_COMMAND};
pub use event::{Callback, DocumentRef, GatewayEvent, TextMessage};
pub use kinds::{Gender, RecordKind};
pub use menu::{MenuButton, MenuMarkup};
