use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::{Duration, Instant};
use tracing::{debug, info};
use uuid::Uuid;

use crate::chat::session::ChatSession;

pub type SharedSession = Arc<Mutex<ChatSession>>;

struct Entry {
    session: SharedSession,
    last_touched: Instant,
}

/// In-memory registry of live chat sessions. Nothing is persisted; removing a
/// session drops its messages.
///
/// Bounded two ways: sessions untouched for `idle_ttl` are evicted, and at
/// `max_sessions` creating a new one evicts the least recently used. A reply
/// still in flight for an evicted session settles into the dropped session.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, Entry>>>,
    idle_ttl: Duration,
    max_sessions: usize,
}

impl SessionStore {
    pub fn new(idle_ttl: Duration, max_sessions: usize) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            idle_ttl,
            max_sessions: max_sessions.max(1),
        }
    }

    pub async fn create(&self) -> SharedSession {
        let id = Uuid::new_v4();
        let session = Arc::new(Mutex::new(ChatSession::new(id)));
        let now = Instant::now();

        let mut sessions = self.sessions.write().await;
        evict_idle_locked(&mut sessions, now, self.idle_ttl);
        while sessions.len() >= self.max_sessions {
            let oldest = sessions
                .iter()
                .min_by_key(|(_, entry)| entry.last_touched)
                .map(|(id, _)| *id);
            match oldest {
                Some(oldest) => {
                    sessions.remove(&oldest);
                    info!(session = %oldest, "Chat session evicted: session limit reached");
                }
                None => break,
            }
        }
        sessions.insert(
            id,
            Entry {
                session: session.clone(),
                last_touched: now,
            },
        );
        debug!(session = %id, "Chat session created");
        session
    }

    /// Looks up a session and marks it as used.
    pub async fn get(&self, id: Uuid) -> Option<SharedSession> {
        let mut sessions = self.sessions.write().await;
        let entry = sessions.get_mut(&id)?;
        entry.last_touched = Instant::now();
        Some(entry.session.clone())
    }

    /// Returns `false` if no such session existed.
    pub async fn remove(&self, id: Uuid) -> bool {
        let removed = self.sessions.write().await.remove(&id).is_some();
        if removed {
            debug!(session = %id, "Chat session discarded");
        }
        removed
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Drops every session idle for at least `idle_ttl`. Returns how many went.
    pub async fn evict_idle(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        evict_idle_locked(&mut sessions, Instant::now(), self.idle_ttl)
    }

    /// Runs `evict_idle` every `period` for the life of the process.
    pub fn spawn_sweeper(&self, period: Duration) -> JoinHandle<()> {
        let store = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let evicted = store.evict_idle().await;
                if evicted > 0 {
                    info!(evicted, "Idle chat sessions evicted");
                }
            }
        })
    }
}

fn evict_idle_locked(sessions: &mut HashMap<Uuid, Entry>, now: Instant, idle_ttl: Duration) -> usize {
    let before = sessions.len();
    sessions.retain(|_, entry| now.saturating_duration_since(entry.last_touched) < idle_ttl);
    before - sessions.len()
}
