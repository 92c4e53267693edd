//! Presence Service (component J) — §4.4.

use std::sync::Arc;

use crate::domain::{ActiveSession, Board, BoardId, IdentityHash};
use crate::error::{AppError, AppResult, ConflictKind, NotFoundKind};
use crate::ports::store::{BoardStore, SessionStore};
use crate::ports::Clock;
use crate::realtime::events::{UserAliasChanged, UserJoined};
use crate::realtime::Broadcaster;

/// Joins `sessions.active_sessions` with `board.admins` to compute each
/// session's `is_admin`, without an `O(participants × admins)` re-scan per
/// session (§4.4 "Admin-set lookup").
pub async fn active_sessions_view(
    sessions: &dyn SessionStore,
    board: &Board,
    now: crate::domain::Timestamp,
    window_millis: i64,
) -> AppResult<Vec<ActiveSession>> {
    let admin_set: std::collections::HashSet<&IdentityHash> = board.admins.iter().collect();
    let active = sessions.active_sessions(board.id, now, window_millis).await?;
    Ok(active
        .into_iter()
        .map(|session| {
            let is_admin = admin_set.contains(&session.identity_hash);
            ActiveSession { session, is_admin }
        })
        .collect())
}

pub struct PresenceService {
    boards: Arc<dyn BoardStore>,
    sessions: Arc<dyn SessionStore>,
    clock: Arc<dyn Clock>,
    broadcaster: Arc<dyn Broadcaster>,
    presence_window_seconds: u64,
}

impl PresenceService {
    #[must_use]
    pub fn new(
        boards: Arc<dyn BoardStore>,
        sessions: Arc<dyn SessionStore>,
        clock: Arc<dyn Clock>,
        broadcaster: Arc<dyn Broadcaster>,
        presence_window_seconds: u64,
    ) -> Self {
        Self { boards, sessions, clock, broadcaster, presence_window_seconds }
    }

    fn window_millis(&self) -> i64 {
        i64::try_from(self.presence_window_seconds.saturating_mul(1000)).unwrap_or(i64::MAX)
    }

    /// §4.4 `Join`. Allowed on closed boards — viewers may join read-only.
    pub async fn join(&self, board_id: BoardId, alias: &str, identity: &IdentityHash) -> AppResult<ActiveSession> {
        if !crate::domain::session::is_valid_alias(alias) {
            return Err(AppError::validation("alias must be 1..50 chars matching ^[A-Za-z0-9 _-]+$"));
        }
        let board = self.boards.find_by_id(board_id).await?.ok_or_else(|| AppError::not_found(NotFoundKind::Board))?;
        let now = self.clock.now();
        let session = self.sessions.upsert(board_id, identity, alias, now).await?;
        let is_admin = board.is_admin(identity);

        let payload = UserJoined {
            board_id: board_id.to_string(),
            identity_hash: identity.to_string(),
            alias: session.alias.clone(),
            is_admin,
        };
        self.broadcaster.user_joined(board_id, payload).await;
        Ok(ActiveSession { session, is_admin })
    }

    /// §4.4 `Heartbeat`. No-op if no session exists yet. Allowed on closed
    /// boards.
    pub async fn heartbeat(&self, board_id: BoardId, identity: &IdentityHash) -> AppResult<()> {
        let now = self.clock.now();
        self.sessions.heartbeat(board_id, identity, now).await?;
        Ok(())
    }

    /// §4.4 `UpdateAlias`. Requires an active board.
    pub async fn update_alias(&self, board_id: BoardId, new_alias: &str, identity: &IdentityHash) -> AppResult<()> {
        if !crate::domain::session::is_valid_alias(new_alias) {
            return Err(AppError::validation("alias must be 1..50 chars matching ^[A-Za-z0-9 _-]+$"));
        }
        let board = self.boards.find_by_id(board_id).await?.ok_or_else(|| AppError::not_found(NotFoundKind::Board))?;
        if board.state.is_closed() {
            return Err(AppError::conflict(ConflictKind::BoardClosed));
        }
        let existing =
            self.sessions.find(board_id, identity).await?.ok_or_else(|| AppError::not_found(NotFoundKind::User))?;
        let old_alias = existing.alias.clone();
        let now = self.clock.now();
        self.sessions.upsert(board_id, identity, new_alias, now).await?;

        self.broadcaster
            .user_alias_changed(
                board_id,
                UserAliasChanged {
                    board_id: board_id.to_string(),
                    identity_hash: identity.to_string(),
                    old_alias,
                    new_alias: new_alias.to_string(),
                },
            )
            .await;
        Ok(())
    }

    /// §4.4 `ActiveUsers`.
    pub async fn active_users(&self, board_id: BoardId) -> AppResult<Vec<ActiveSession>> {
        let board = self.boards.find_by_id(board_id).await?.ok_or_else(|| AppError::not_found(NotFoundKind::Board))?;
        let now = self.clock.now();
        active_sessions_view(self.sessions.as_ref(), &board, now, self.window_millis()).await
    }
}

#[cfg(test)]
#[path = "presence_service_test.rs"]
mod tests;
