//! Registry of open client connections.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use dashmap::DashMap;
use tracing::debug;

/// Information kept about one open connection.
#[derive(Debug, Clone)]
pub struct SessionInfo {
    /// Remote address, absent for stdio
    pub peer: Option<SocketAddr>,

    /// When the connection was accepted
    pub opened_at: Instant,
}

/// Concurrent map of live sessions.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    next_id: AtomicU64,
    sessions: DashMap<u64, SessionInfo>,
}

impl SessionRegistry {
    /// Creates an empty registry.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Registers a new session. It is removed when the returned guard drops.
    pub fn open(self: &Arc<Self>, peer: Option<SocketAddr>) -> SessionGuard {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        self.sessions.insert(
            id,
            SessionInfo {
                peer,
                opened_at: Instant::now(),
            },
        );
        debug!(session = id, ?peer, "Session opened");
        SessionGuard {
            id,
            registry: Arc::clone(self),
        }
    }

    /// Returns the info for a live session.
    pub fn get(&self, id: u64) -> Option<SessionInfo> {
        self.sessions.get(&id).map(|entry| entry.value().clone())
    }

    /// Number of open sessions.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Whether no session is open.
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

/// Keeps a session registered for as long as it lives.
#[derive(Debug)]
pub struct SessionGuard {
    id: u64,
    registry: Arc<SessionRegistry>,
}

impl SessionGuard {
    /// The session identifier.
    pub fn id(&self) -> u64 {
        self.id
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        if let Some((id, info)) = self.registry.sessions.remove(&self.id) {
            let elapsed_ms = info.opened_at.elapsed().as_millis() as u64;
            debug!(session = id, elapsed_ms, "Session closed");
        }
    }
}
