use crate::session::Session;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sdrbot_core::{SdrbotError, SdrbotResult};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

/// Outcome of [`SessionStore::create`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateOutcome {
    /// The session was created.
    Created,
    /// A session with this id already exists; the store is unchanged.
    AlreadyExists,
}

/// Session storage contract, injected into handlers as `Arc<dyn SessionStore>`.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Inserts a new session. Existing sessions are left untouched, which
    /// keeps `start_conversation` idempotent for a given id.
    async fn create(&self, session: Session) -> SdrbotResult<CreateOutcome>;

    /// Returns a snapshot of the session, if it exists.
    async fn get(&self, id: &str) -> SdrbotResult<Option<Session>>;

    /// Writes back a mutated session. Fails with
    /// [`SdrbotError::SessionNotFound`] if the id is unknown (the session may
    /// have been expired between a get and an update).
    async fn update(&self, session: Session) -> SdrbotResult<()>;

    /// Ids of all live sessions.
    async fn list(&self) -> SdrbotResult<Vec<String>>;

    /// Removes every session whose `updated_at` is older than `cutoff`,
    /// returning the removed ids.
    async fn remove_idle_since(&self, cutoff: DateTime<Utc>) -> SdrbotResult<Vec<String>>;
}

/// In-memory session store.
///
/// Volatile: all sessions are lost on process restart. Bounded only by the
/// idle-expiry sweep, which the server drives via
/// [`remove_idle_since`](SessionStore::remove_idle_since).
#[derive(Default)]
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<String, Session>>,
}

impl MemorySessionStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn create(&self, session: Session) -> SdrbotResult<CreateOutcome> {
        let mut sessions = self.sessions.write().await;
        if sessions.contains_key(&session.id) {
            return Ok(CreateOutcome::AlreadyExists);
        }
        debug!(session_id = %session.id, "session created");
        sessions.insert(session.id.clone(), session);
        Ok(CreateOutcome::Created)
    }

    async fn get(&self, id: &str) -> SdrbotResult<Option<Session>> {
        Ok(self.sessions.read().await.get(id).cloned())
    }

    async fn update(&self, session: Session) -> SdrbotResult<()> {
        let mut sessions = self.sessions.write().await;
        match sessions.get_mut(&session.id) {
            Some(slot) => {
                *slot = session;
                Ok(())
            }
            None => Err(SdrbotError::SessionNotFound(session.id)),
        }
    }

    async fn list(&self) -> SdrbotResult<Vec<String>> {
        Ok(self.sessions.read().await.keys().cloned().collect())
    }

    async fn remove_idle_since(&self, cutoff: DateTime<Utc>) -> SdrbotResult<Vec<String>> {
        let mut sessions = self.sessions.write().await;
        let expired: Vec<String> = sessions
            .iter()
            .filter(|(_, s)| s.updated_at < cutoff)
            .map(|(id, _)| id.clone())
            .collect();
        for id in &expired {
            sessions.remove(id);
        }
        if !expired.is_empty() {
            debug!(count = expired.len(), "expired idle sessions");
        }
        Ok(expired)
    }
}
