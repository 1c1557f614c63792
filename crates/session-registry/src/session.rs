//! Per-conversation session state.

use database::User;
use tokio::sync::{Mutex, MutexGuard, RwLock};
use tokio::time::{Duration, Instant};

use crate::menu::MenuStack;
use crate::mode::Mode;

/// Ephemeral state for one active conversation.
///
/// Sessions are a cache of in-progress interaction, never persisted:
/// eviction loses only the menu position and workflow mode, both of
/// which rebuild to defaults on the next inbound event.
///
/// Fields are individually locked because handlers for the same
/// conversation may overlap; overlapping updates must stay consistent
/// even when their visible order is not.
#[derive(Debug)]
pub struct Session {
    chat_id: i64,
    user: RwLock<Option<User>>,
    menu: Mutex<MenuStack>,
    mode: Mutex<Mode>,
    last_active: Mutex<Instant>,
}

impl Session {
    /// Create a session, active as of now.
    pub fn new(chat_id: i64, user: Option<User>, menu: MenuStack) -> Self {
        Self {
            chat_id,
            user: RwLock::new(user),
            menu: Mutex::new(menu),
            mode: Mutex::new(Mode::None),
            last_active: Mutex::new(Instant::now()),
        }
    }

    /// Conversation identifier this session belongs to.
    pub fn chat_id(&self) -> i64 {
        self.chat_id
    }

    /// Mark the session active now. Called on every inbound event.
    pub async fn touch(&self) {
        *self.last_active.lock().await = Instant::now();
    }

    /// How long the session has been idle.
    pub async fn idle_for(&self) -> Duration {
        self.last_active.lock().await.elapsed()
    }

    /// The registered profile, if any.
    pub async fn user(&self) -> Option<User> {
        self.user.read().await.clone()
    }

    /// Install or clear the registered profile.
    pub async fn set_user(&self, user: Option<User>) {
        *self.user.write().await = user;
    }

    /// Snapshot of the current workflow mode.
    pub async fn mode(&self) -> Mode {
        self.mode.lock().await.clone()
    }

    /// Replace the workflow mode.
    pub async fn set_mode(&self, mode: Mode) {
        *self.mode.lock().await = mode;
    }

    /// Exclusive access to the menu stack for one navigation step.
    pub async fn menu(&self) -> MutexGuard<'_, MenuStack> {
        self.menu.lock().await
    }
}
