//! Session management for the HTTP API
//!
//! Maps session tokens to a logged-in user and that user's list store.

use std::{collections::HashMap, sync::Arc};

use tokio::sync::RwLock;
use topfive::{ListStore, user::UserSession};
use uuid::Uuid;

/// Session token (UUID stored in cookie)
pub type SessionToken = String;

/// One logged-in browser: who it is and what it is looking at.
pub struct Session {
    pub user: UserSession,
    pub store: ListStore,
}

/// In-memory session store
///
/// Sessions are ephemeral and lost on server restart. Each session is locked
/// independently, so one user's slow request never blocks another's.
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<SessionToken, Arc<RwLock<Session>>>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new session and return its token
    pub async fn create_session(&self, user: UserSession, store: ListStore) -> SessionToken {
        let token = Uuid::new_v4().to_string();
        let mut sessions = self.sessions.write().await;
        sessions.insert(token.clone(), Arc::new(RwLock::new(Session { user, store })));
        token
    }

    pub async fn get(&self, token: &str) -> Option<Arc<RwLock<Session>>> {
        let sessions = self.sessions.read().await;
        sessions.get(token).cloned()
    }

    /// Remove a session, returning it if it existed
    pub async fn destroy_session(&self, token: &str) -> Option<Arc<RwLock<Session>>> {
        let mut sessions = self.sessions.write().await;
        sessions.remove(token)
    }

    /// Number of active sessions
    pub async fn session_count(&self) -> usize {
        let sessions = self.sessions.read().await;
        sessions.len()
    }
}
