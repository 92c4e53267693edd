//! In-memory `SessionStore` test adapter.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::{BoardId, IdentityHash, Session, Timestamp};
use crate::error::StoreResult;
use crate::ports::store::SessionStore;

#[derive(Default)]
pub struct MemorySessionStore {
    sessions: Mutex<HashMap<(BoardId, IdentityHash), Session>>,
}

impl MemorySessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn upsert(&self, board_id: BoardId, identity: &IdentityHash, alias: &str, now: Timestamp) -> StoreResult<Session> {
        let mut sessions = self.sessions.lock().unwrap();
        let key = (board_id, identity.clone());
        let session = sessions.entry(key).or_insert_with(|| Session {
            board_id,
            identity_hash: identity.clone(),
            alias: alias.to_string(),
            last_active: now,
            created_at: now,
        });
        session.alias = alias.to_string();
        session.last_active = now;
        Ok(session.clone())
    }

    async fn heartbeat(&self, board_id: BoardId, identity: &IdentityHash, now: Timestamp) -> StoreResult<bool> {
        let mut sessions = self.sessions.lock().unwrap();
        let Some(session) = sessions.get_mut(&(board_id, identity.clone())) else {
            return Ok(false);
        };
        session.last_active = now;
        Ok(true)
    }

    async fn find(&self, board_id: BoardId, identity: &IdentityHash) -> StoreResult<Option<Session>> {
        Ok(self.sessions.lock().unwrap().get(&(board_id, identity.clone())).cloned())
    }

    async fn active_sessions(&self, board_id: BoardId, now: Timestamp, window_millis: i64) -> StoreResult<Vec<Session>> {
        Ok(self
            .sessions
            .lock()
            .unwrap()
            .values()
            .filter(|s| s.board_id == board_id && now - s.last_active <= window_millis)
            .cloned()
            .collect())
    }

    async fn delete_by_board(&self, board_id: BoardId) -> StoreResult<u64> {
        let mut sessions = self.sessions.lock().unwrap();
        let before = sessions.len();
        sessions.retain(|(b, _), _| *b != board_id);
        Ok(u64::try_from(before - sessions.len()).unwrap_or(0))
    }
}
