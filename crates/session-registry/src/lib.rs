//! Per-conversation session engine.
//!
//! Holds the concurrent [`SessionRegistry`], the per-session
//! [`MenuStack`] for one-level back navigation, and the workflow
//! [`Mode`] that decides how the next free-text message is read.
//! Sessions are ephemeral: a background sweep evicts entries idle
//! longer than [`IDLE_THRESHOLD`], and the next event simply rebuilds
//! a fresh one.

mod menu;
mod mode;
mod registry;
mod session;

pub use menu::MenuStack;
pub use mode::{Draft, Mode};
pub use registry::{SessionRegistry, IDLE_THRESHOLD, SWEEP_PERIOD};
pub use session::Session;
