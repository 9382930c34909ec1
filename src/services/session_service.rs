use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use tokio::sync::Mutex as AsyncMutex;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::session::Session;

pub type SessionHandle = Arc<AsyncMutex<Session>>;

#[derive(Debug)]
struct SessionEntry {
    handle: SessionHandle,
    last_seen: Instant,
}

/// Id -> session map. Each session is locked on its own; the map lock is
/// only held for lookups and never across an await.
#[derive(Clone, Debug, Default)]
pub struct SessionStore {
    sessions: Arc<Mutex<HashMap<Uuid, SessionEntry>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&self) -> (Uuid, SessionHandle) {
        let id = Uuid::new_v4();
        let handle = Arc::new(AsyncMutex::new(Session::new(id)));
        let mut sessions = self.sessions.lock().expect("session store mutex poisoned");
        sessions.insert(
            id,
            SessionEntry {
                handle: handle.clone(),
                last_seen: Instant::now(),
            },
        );
        tracing::info!(session_id = %id, active = sessions.len(), "session created");
        (id, handle)
    }

    pub fn get(&self, id: Uuid) -> Result<SessionHandle> {
        let mut sessions = self.sessions.lock().expect("session store mutex poisoned");
        let entry = sessions
            .get_mut(&id)
            .ok_or_else(|| Error::NotFound(format!("Session {} not found or expired", id)))?;
        entry.last_seen = Instant::now();
        Ok(entry.handle.clone())
    }

    pub fn remove(&self, id: Uuid) -> bool {
        let removed = self
            .sessions
            .lock()
            .expect("session store mutex poisoned")
            .remove(&id)
            .is_some();
        if removed {
            tracing::info!(session_id = %id, "session closed");
        }
        removed
    }

    /// Drops sessions not touched within `ttl`. Returns how many were dropped.
    pub fn purge_idle(&self, ttl: Duration) -> usize {
        let mut sessions = self.sessions.lock().expect("session store mutex poisoned");
        let before = sessions.len();
        sessions.retain(|_, entry| entry.last_seen.elapsed() < ttl);
        let purged = before - sessions.len();
        if purged > 0 {
            tracing::info!(purged, remaining = sessions.len(), "expired idle sessions");
        }
        purged
    }

    pub fn len(&self) -> usize {
        self.sessions.lock().expect("session store mutex poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
