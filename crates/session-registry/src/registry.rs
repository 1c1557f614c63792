//! Concurrent session registry with idle eviction.

use std::collections::HashMap;
use std::sync::Arc;

use database::User;
use tokio::sync::{Mutex, Notify, RwLock};
use tokio::task::JoinHandle;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::menu::MenuStack;
use crate::session::Session;

/// How often the eviction sweep runs.
pub const SWEEP_PERIOD: Duration = Duration::from_secs(5 * 60);

/// Idle time after which a session is evicted.
pub const IDLE_THRESHOLD: Duration = Duration::from_secs(15 * 60);

/// Concurrent map of active sessions, keyed by conversation id.
///
/// Eviction is best-effort: a session may receive an event while the
/// sweep is evaluating it. Losing that race just means the next event
/// recreates a fresh session with default menu and mode.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: RwLock<HashMap<i64, Arc<Session>>>,
    sweeper: Mutex<Option<JoinHandle<()>>>,
    shutdown: Notify,
}

impl SessionRegistry {
    /// Create an empty registry. The sweeper is started separately so
    /// tests can drive eviction by hand.
    pub fn new() -> Self {
        Self::default()
    }

    /// Non-blocking lookup.
    pub async fn get(&self, chat_id: i64) -> Option<Arc<Session>> {
        self.sessions.read().await.get(&chat_id).cloned()
    }

    /// Insert a new session iff none exists for this conversation.
    /// Returns false without overwriting when one is already present.
    pub async fn create(&self, chat_id: i64, user: Option<User>, menu: MenuStack) -> bool {
        let mut sessions = self.sessions.write().await;
        if sessions.contains_key(&chat_id) {
            return false;
        }
        sessions.insert(chat_id, Arc::new(Session::new(chat_id, user, menu)));
        debug!(chat_id, "session created");
        true
    }

    /// Fetch the session for a conversation, creating it lazily.
    pub async fn get_or_create(&self, chat_id: i64, menu: MenuStack) -> Arc<Session> {
        if let Some(session) = self.get(chat_id).await {
            return session;
        }

        let mut sessions = self.sessions.write().await;
        sessions
            .entry(chat_id)
            .or_insert_with(|| {
                debug!(chat_id, "session created");
                Arc::new(Session::new(chat_id, None, menu))
            })
            .clone()
    }

    /// Remove a session. Returns false if it was absent.
    pub async fn remove(&self, chat_id: i64) -> bool {
        let removed = self.sessions.write().await.remove(&chat_id).is_some();
        if removed {
            debug!(chat_id, "session removed");
        }
        removed
    }

    /// Number of currently active sessions.
    pub async fn count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Evict every session idle longer than `threshold`. Returns how
    /// many were removed.
    pub async fn sweep_once(&self, threshold: Duration) -> usize {
        let candidates: Vec<Arc<Session>> =
            self.sessions.read().await.values().cloned().collect();

        let mut expired = Vec::new();
        for session in candidates {
            if session.idle_for().await > threshold {
                expired.push(session.chat_id());
            }
        }

        if expired.is_empty() {
            return 0;
        }

        let mut sessions = self.sessions.write().await;
        let mut removed = 0;
        for chat_id in expired {
            if sessions.remove(&chat_id).is_some() {
                removed += 1;
            }
        }

        info!(removed, "evicted idle sessions");
        removed
    }

    /// Start the periodic eviction sweep. Runs until [`shutdown`] is
    /// called.
    ///
    /// [`shutdown`]: SessionRegistry::shutdown
    pub async fn start_sweeper(self: &Arc<Self>) {
        self.start_sweeper_with(SWEEP_PERIOD, IDLE_THRESHOLD).await;
    }

    /// Start the sweep with an explicit period and threshold.
    pub async fn start_sweeper_with(self: &Arc<Self>, period: Duration, threshold: Duration) {
        let mut slot = self.sweeper.lock().await;
        if slot.is_some() {
            warn!("eviction sweeper already running");
            return;
        }

        let registry = Arc::clone(self);
        let handle = tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // The first tick fires immediately; skip it.
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        registry.sweep_once(threshold).await;
                    }
                    _ = registry.shutdown.notified() => {
                        debug!("eviction sweeper stopping");
                        break;
                    }
                }
            }
        });

        *slot = Some(handle);
        info!(?period, ?threshold, "eviction sweeper started");
    }

    /// Stop the eviction sweep and wait for it to finish.
    pub async fn shutdown(&self) {
        self.shutdown.notify_waiters();
        if let Some(handle) = self.sweeper.lock().await.take() {
            if let Err(error) = handle.await {
                warn!(%error, "eviction sweeper task failed");
            }
        }
    }
}
