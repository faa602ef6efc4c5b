//! Session registry.
//!
//! Maps a [`SessionId`] to its conversation. Each session sits behind its own
//! `tokio::sync::Mutex`, so turns on one session run strictly one after the
//! other while different sessions proceed in parallel. Never hold a `DashMap`
//! guard across an await: clone the handle out first.
//!
//! The registry is bounded two ways: a sweeper evicts sessions idle past a
//! TTL, and an optional cap recycles the least recently active idle session
//! when a new one is needed.

use std::sync::Arc;
use std::time::Duration;

use chatgate_types::chat::SessionId;
use chatgate_types::error::ChatError;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use super::store::ConversationStore;

/// One conversation and its bookkeeping.
#[derive(Debug)]
pub struct Session {
    pub id: SessionId,
    pub store: ConversationStore,
    /// Completed exchanges (user message + assistant reply).
    pub turns: u64,
    pub last_active: DateTime<Utc>,
}

impl Session {
    pub fn new(id: SessionId, system_prompt: &str) -> Self {
        Self {
            id,
            store: ConversationStore::new(system_prompt),
            turns: 0,
            last_active: Utc::now(),
        }
    }

    /// Record a committed exchange.
    pub fn record_turn(&mut self) {
        self.turns += 1;
        self.last_active = Utc::now();
    }
}

pub type SessionHandle = Arc<Mutex<Session>>;

/// Concurrent map of live sessions.
pub struct SessionRegistry {
    sessions: DashMap<SessionId, SessionHandle>,
    system_prompt: String,
    /// `0` means unlimited.
    max_sessions: usize,
}

impl SessionRegistry {
    pub fn new(system_prompt: impl Into<String>) -> Self {
        Self {
            sessions: DashMap::new(),
            system_prompt: system_prompt.into(),
            max_sessions: 0,
        }
    }

    pub fn with_max_sessions(mut self, max_sessions: usize) -> Self {
        self.max_sessions = max_sessions;
        self
    }

    /// Fetch a session, creating a freshly seeded one if it does not exist.
    ///
    /// At the session cap the least recently active idle session is evicted
    /// first. If every session is in use the request is refused.
    pub fn get_or_create(&self, id: &SessionId) -> Result<SessionHandle, ChatError> {
        if let Some(handle) = self.get(id) {
            return Ok(handle);
        }

        if self.max_sessions > 0
            && self.sessions.len() >= self.max_sessions
            && !self.evict_least_recent()
        {
            tracing::warn!(limit = self.max_sessions, "session limit reached");
            return Err(ChatError::TooManySessions {
                limit: self.max_sessions,
            });
        }

        Ok(self
            .sessions
            .entry(id.clone())
            .or_insert_with(|| {
                tracing::debug!(session_id = %id, "creating session");
                Arc::new(Mutex::new(Session::new(id.clone(), &self.system_prompt)))
            })
            .value()
            .clone())
    }

    /// Evict the idle session with the oldest activity. Returns whether one
    /// was evicted.
    fn evict_least_recent(&self) -> bool {
        let victim = self
            .sessions
            .iter()
            .filter(|entry| Arc::strong_count(entry.value()) == 1)
            .filter_map(|entry| {
                let last_active = entry.value().try_lock().ok()?.last_active;
                Some((entry.key().clone(), last_active))
            })
            .min_by_key(|(_, last_active)| *last_active)
            .map(|(id, _)| id);

        let Some(victim) = victim else {
            return false;
        };
        let evicted = self
            .sessions
            .remove_if(&victim, |_, handle| Arc::strong_count(handle) == 1)
            .is_some();
        if evicted {
            tracing::debug!(session_id = %victim, "evicted least recently active session");
        }
        evicted
    }

    pub fn get(&self, id: &SessionId) -> Option<SessionHandle> {
        self.sessions.get(id).map(|entry| entry.value().clone())
    }

    /// Drop a session. Returns whether it existed.
    ///
    /// A turn already holding the old handle finishes against the detached
    /// session; the next request starts over from the system prompt.
    pub fn reset(&self, id: &SessionId) -> bool {
        self.sessions.remove(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Evict sessions whose last activity is older than `cutoff`.
    ///
    /// Sessions that are locked or whose handle is held elsewhere are in use
    /// and always kept. Returns the number of evicted sessions.
    pub fn evict_idle_before(&self, cutoff: DateTime<Utc>) -> usize {
        let before = self.sessions.len();
        self.sessions.retain(|_, handle| {
            if Arc::strong_count(handle) > 1 {
                return true;
            }
            match handle.try_lock() {
                Ok(session) => session.last_active >= cutoff,
                Err(_) => true,
            }
        });
        before.saturating_sub(self.sessions.len())
    }

    /// Evict sessions idle for longer than `ttl`.
    pub fn evict_idle(&self, ttl: Duration) -> usize {
        let ttl = chrono::Duration::from_std(ttl).unwrap_or_else(|_| chrono::Duration::days(36_500));
        let cutoff = Utc::now()
            .checked_sub_signed(ttl)
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        self.evict_idle_before(cutoff)
    }

    /// Periodically evict idle sessions until the task is aborted.
    pub fn spawn_idle_sweeper(
        self: Arc<Self>,
        ttl: Duration,
        interval: Duration,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // The first tick completes immediately.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let evicted = self.evict_idle(ttl);
                if evicted > 0 {
                    tracing::info!(evicted, remaining = self.len(), "evicted idle sessions");
                }
            }
        })
    }
}
