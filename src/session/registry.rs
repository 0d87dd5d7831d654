//! Process-wide session registry.
//!
//! The registry is the only shared mutable state in the crate. Its lock
//! guards the id map alone and is never held while signaling or joining a
//! worker, so one session's shutdown cannot block another's start or stop.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use super::{SessionHandle, SessionId};

/// Map from session id to session handle.
#[derive(Debug)]
pub struct SessionRegistry {
    sessions: Mutex<HashMap<SessionId, SessionHandle>>,
    next_id: AtomicU64,
}

impl SessionRegistry {
    /// Creates an empty registry. The first allocated id is 1.
    #[must_use]
    pub fn new() -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Allocates a fresh id. Ids are strictly increasing and never reused,
    /// even when the allocating `start` later fails or the session is removed.
    pub(crate) fn allocate_id(&self) -> SessionId {
        SessionId::from_raw(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    /// Inserts a handle under a previously allocated id.
    pub(crate) fn insert(&self, id: SessionId, handle: SessionHandle) {
        self.sessions.lock().unwrap().insert(id, handle);
    }

    /// Returns true if the id currently resolves to a live session.
    #[must_use]
    pub fn contains(&self, id: SessionId) -> bool {
        self.sessions.lock().unwrap().contains_key(&id)
    }

    /// Atomically removes and returns the handle for `id`, if present.
    ///
    /// Lookup and removal are one operation under the lock, so two concurrent
    /// `stop` calls on the same id cannot both obtain the handle.
    pub(crate) fn remove(&self, id: SessionId) -> Option<SessionHandle> {
        self.sessions.lock().unwrap().remove(&id)
    }

    /// Number of live sessions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.lock().unwrap().len()
    }

    /// Returns true if no sessions are live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions.lock().unwrap().is_empty()
    }

    /// Snapshot of live session ids, in ascending order.
    #[must_use]
    pub fn ids(&self) -> Vec<SessionId> {
        let mut ids: Vec<SessionId> = self.sessions.lock().unwrap().keys().copied().collect();
        ids.sort_unstable();
        ids
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
