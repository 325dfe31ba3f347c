//! Session storage implementation
//!
//! Sessions live in memory for the lifetime of the process. Nothing is
//! persisted; a restart forgets every session, profile and order. Access is
//! keyed by user so one user's reads and writes never block another's.

use std::collections::HashMap;
use std::sync::Arc;
use dashmap::DashMap;
use tracing::debug;

use crate::models::UserId;
use super::flows::FlowId;
use super::session::Session;

/// In-memory session store
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<DashMap<UserId, Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of a user's session, created on first access
    pub fn get(&self, user_id: UserId) -> Session {
        self.sessions
            .entry(user_id)
            .or_insert_with(|| {
                debug!(user_id = %user_id, "Creating session");
                Session::new(user_id)
            })
            .clone()
    }

    /// Snapshot of a user's session without creating one
    pub fn peek(&self, user_id: UserId) -> Option<Session> {
        self.sessions.get(&user_id).map(|s| s.clone())
    }

    /// Replace the stored session; the only write path
    pub fn commit(&self, user_id: UserId, session: Session) {
        debug_assert_eq!(user_id, session.user_id, "session committed under another user's key");
        debug!(user_id = %user_id, flow = ?session.current_flow(), step = ?session.current_step(),
               "Committing session");
        self.sessions.insert(user_id, session);
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Users that currently have a session
    pub fn active_users(&self) -> Vec<UserId> {
        self.sessions.iter().map(|entry| *entry.key()).collect()
    }

    /// Get storage statistics
    pub fn stats(&self) -> StoreStats {
        let mut flows_count = HashMap::new();
        let mut active_flows = 0;

        for entry in self.sessions.iter() {
            if let Some(flow) = entry.current_flow() {
                active_flows += 1;
                *flows_count.entry(flow).or_insert(0) += 1;
            }
        }

        StoreStats {
            total_sessions: self.sessions.len(),
            active_flows,
            flows_count,
        }
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("sessions", &self.sessions.len())
            .finish()
    }
}

/// Storage statistics
#[derive(Debug, Clone, serde::Serialize)]
pub struct StoreStats {
    pub total_sessions: usize,
    pub active_flows: usize,
    pub flows_count: HashMap<FlowId, u32>,
}
