//! Session registry for active bridge connections.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

/// Details of one active bridge session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionInfo {
    /// The client's peer address
    pub peer: String,
    /// The upstream model the session is bridged to
    pub model: String,
}

/// Registry of active bridge sessions, keyed by session id.
///
/// Every accepted connection registers its own entry; nothing is shared
/// between sessions, so any number of simultaneous users can hold live
/// conversations.
#[derive(Clone, Default)]
pub struct SessionRegistry {
    sessions: Arc<RwLock<HashMap<Uuid, SessionInfo>>>,
}

impl SessionRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new session, returning its id.
    pub fn register(&self, info: SessionInfo) -> Uuid {
        let id = Uuid::new_v4();
        self.sessions.write().unwrap().insert(id, info);
        tracing::info!(session = %id, "Live session registered");
        id
    }

    /// Remove a session by id. Returns the removed entry, if present.
    pub fn remove(&self, id: &Uuid) -> Option<SessionInfo> {
        let removed = self.sessions.write().unwrap().remove(id);
        if removed.is_some() {
            tracing::info!(session = %id, "Live session removed");
        }
        removed
    }

    /// Look up a session by id.
    pub fn get(&self, id: &Uuid) -> Option<SessionInfo> {
        self.sessions.read().unwrap().get(id).cloned()
    }

    /// Number of active sessions.
    pub fn len(&self) -> usize {
        self.sessions.read().unwrap().len()
    }

    /// Whether no sessions are active.
    pub fn is_empty(&self) -> bool {
        self.sessions.read().unwrap().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(peer: &str) -> SessionInfo {
        SessionInfo {
            peer: peer.to_string(),
            model: "models/gemini-2.0-flash-live-001".to_string(),
        }
    }

    #[test]
    fn tracks_concurrent_sessions_independently() {
        let registry = SessionRegistry::new();

        let a = registry.register(info("127.0.0.1:50001"));
        let b = registry.register(info("127.0.0.1:50002"));
        assert_ne!(a, b);
        assert_eq!(registry.len(), 2);

        assert_eq!(registry.get(&a).unwrap().peer, "127.0.0.1:50001");
        assert_eq!(registry.get(&b).unwrap().peer, "127.0.0.1:50002");

        // Removing one session leaves the other untouched
        assert!(registry.remove(&a).is_some());
        assert_eq!(registry.len(), 1);
        assert!(registry.get(&a).is_none());
        assert!(registry.get(&b).is_some());
    }

    #[test]
    fn removing_twice_is_a_noop() {
        let registry = SessionRegistry::new();
        let id = registry.register(info("127.0.0.1:50001"));

        assert!(registry.remove(&id).is_some());
        assert!(registry.remove(&id).is_none());
        assert!(registry.is_empty());
    }
}
