//! Board Service (component G) — §4.1.

use std::sync::Arc;

use rand::Rng;

use crate::domain::{Board, BoardId, BoardLifecycle, BoardView, Column, IdentityHash, ShareableLink};
use crate::error::{AppError, AppResult, ConflictKind, NotFoundKind};
use crate::ports::store::{BoardStore, CardStore, ReactionStore, SessionStore, UpdateOutcome};
use crate::ports::Clock;
use crate::realtime::events::{BoardClosed, BoardDeleted, BoardRenamed, ColumnRenamed};
use crate::realtime::Broadcaster;

use super::presence_service::active_sessions_view;

pub struct CreateBoardInput {
    pub name: String,
    pub columns: Vec<Column>,
    pub card_limit: Option<u32>,
    pub reaction_limit: Option<u32>,
}

/// Who may authorize `DeleteBoard` (§4.1): the creator, or anyone holding
/// the admin secret.
pub enum DeleteAuthorization<'a> {
    Identity(&'a IdentityHash),
    AdminSecret(&'a str),
}

pub struct BoardService {
    boards: Arc<dyn BoardStore>,
    cards: Arc<dyn CardStore>,
    reactions: Arc<dyn ReactionStore>,
    sessions: Arc<dyn SessionStore>,
    clock: Arc<dyn Clock>,
    broadcaster: Arc<dyn Broadcaster>,
    shareable_link_length: usize,
    shareable_link_retry_count: usize,
    presence_window_seconds: u64,
    admin_secret: String,
}

impl BoardService {
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        boards: Arc<dyn BoardStore>,
        cards: Arc<dyn CardStore>,
        reactions: Arc<dyn ReactionStore>,
        sessions: Arc<dyn SessionStore>,
        clock: Arc<dyn Clock>,
        broadcaster: Arc<dyn Broadcaster>,
        shareable_link_length: usize,
        shareable_link_retry_count: usize,
        presence_window_seconds: u64,
        admin_secret: String,
    ) -> Self {
        Self {
            boards,
            cards,
            reactions,
            sessions,
            clock,
            broadcaster,
            shareable_link_length,
            shareable_link_retry_count,
            presence_window_seconds,
            admin_secret,
        }
    }

    fn window_millis(&self) -> i64 {
        i64::try_from(self.presence_window_seconds.saturating_mul(1000)).unwrap_or(i64::MAX)
    }

    fn mint_link(&self) -> ShareableLink {
        let mut rng = rand::rng();
        let link: String = (0..self.shareable_link_length).map(|_| char::from_digit(rng.random_range(0..16), 16).unwrap()).collect();
        ShareableLink::new(link)
    }

    fn validate_input(input: &CreateBoardInput) -> AppResult<()> {
        let name_len = input.name.chars().count();
        if !(1..=200).contains(&name_len) {
            return Err(AppError::validation("board name must be 1..200 chars"));
        }
        if !(1..=10).contains(&input.columns.len()) {
            return Err(AppError::validation("board must have 1..10 columns"));
        }
        for column in &input.columns {
            if !crate::domain::ids::is_valid_column_id(&column.id) {
                return Err(AppError::validation(format!("invalid column id: {}", column.id)));
            }
            let col_len = column.name.chars().count();
            if !(1..=100).contains(&col_len) {
                return Err(AppError::validation("column name must be 1..100 chars"));
            }
        }
        let unique: std::collections::HashSet<&str> = input.columns.iter().map(|c| c.id.as_str()).collect();
        if unique.len() != input.columns.len() {
            return Err(AppError::validation("column ids must be unique within a board"));
        }
        Ok(())
    }

    /// §4.1 `CreateBoard`. Retries shareable-link generation up to
    /// `shareable_link_retry_count` times on a duplicate-key collision.
    pub async fn create_board(&self, input: CreateBoardInput, identity: &IdentityHash) -> AppResult<Board> {
        Self::validate_input(&input)?;
        let now = self.clock.now();

        for _ in 0..=self.shareable_link_retry_count {
            let board = Board {
                id: BoardId::new(),
                name: input.name.clone(),
                columns: input.columns.clone(),
                admins: vec![identity.clone()],
                state: BoardLifecycle::Active,
                closed_at: None,
                card_limit: input.card_limit,
                reaction_limit: input.reaction_limit,
                creator_hash: identity.clone(),
                shareable_link: self.mint_link(),
                created_at: now,
            };
            match self.boards.insert(&board).await {
                Ok(()) => return Ok(board),
                Err(crate::error::StoreError::DuplicateKey) => continue,
                Err(e) => return Err(e.into()),
            }
        }
        Err(AppError::Internal("shareable link generation exhausted its retry budget".into()))
    }

    /// §4.1 `GetBoard`.
    pub async fn get_board(&self, id: BoardId) -> AppResult<BoardView> {
        let board = self.boards.find_by_id(id).await?.ok_or_else(|| AppError::not_found(NotFoundKind::Board))?;
        self.view_of(board).await
    }

    /// §4.1 `GetBoardByLink`.
    pub async fn get_board_by_link(&self, link: &ShareableLink) -> AppResult<BoardView> {
        let board =
            self.boards.find_by_shareable_link(link).await?.ok_or_else(|| AppError::not_found(NotFoundKind::Board))?;
        self.view_of(board).await
    }

    async fn view_of(&self, board: Board) -> AppResult<BoardView> {
        let now = self.clock.now();
        let active_users = active_sessions_view(self.sessions.as_ref(), &board, now, self.window_millis()).await?;
        Ok(BoardView { board, active_users })
    }

    /// Re-reads a board after a zero-matched conditional update, to
    /// distinguish not-found / closed / forbidden (§4.1, §7 propagation).
    async fn classify_write_failure(&self, id: BoardId, identity: &IdentityHash) -> AppError {
        match self.boards.find_by_id(id).await {
            Ok(None) => AppError::not_found(NotFoundKind::Board),
            Ok(Some(board)) if board.state.is_closed() => AppError::conflict(ConflictKind::BoardClosed),
            Ok(Some(board)) if !board.is_admin(identity) => AppError::forbidden("admin"),
            Ok(Some(_)) => AppError::Internal("conditional update reported no match for an unexplained reason".into()),
            Err(e) => e.into(),
        }
    }

    /// §4.1 `RenameBoard`.
    pub async fn rename_board(&self, id: BoardId, name: &str, identity: &IdentityHash) -> AppResult<()> {
        let len = name.chars().count();
        if !(1..=200).contains(&len) {
            return Err(AppError::validation("board name must be 1..200 chars"));
        }
        match self.boards.rename(id, name, identity).await? {
            UpdateOutcome::Applied => {
                self.broadcaster
                    .board_renamed(id, BoardRenamed { board_id: id.to_string(), name: name.to_string() })
                    .await;
                Ok(())
            }
            UpdateOutcome::NotMatched => Err(self.classify_write_failure(id, identity).await),
        }
    }

    /// §4.1 `RenameColumn`.
    pub async fn rename_column(
        &self,
        id: BoardId,
        column_id: &str,
        name: &str,
        identity: &IdentityHash,
    ) -> AppResult<()> {
        let len = name.chars().count();
        if !(1..=100).contains(&len) {
            return Err(AppError::validation("column name must be 1..100 chars"));
        }
        match self.boards.rename_column(id, column_id, name, identity).await? {
            UpdateOutcome::Applied => {
                self.broadcaster
                    .column_renamed(
                        id,
                        ColumnRenamed { board_id: id.to_string(), column_id: column_id.to_string(), name: name.to_string() },
                    )
                    .await;
                Ok(())
            }
            UpdateOutcome::NotMatched => {
                let board = self.boards.find_by_id(id).await?.ok_or_else(|| AppError::not_found(NotFoundKind::Board))?;
                if board.state.is_closed() {
                    return Err(AppError::conflict(ConflictKind::BoardClosed));
                }
                if !board.is_admin(identity) {
                    return Err(AppError::forbidden("admin"));
                }
                if !board.has_column(column_id) {
                    return Err(AppError::not_found(NotFoundKind::Column));
                }
                Err(AppError::Internal("conditional column update reported no match for an unexplained reason".into()))
            }
        }
    }

    /// §4.1 `CloseBoard`. Idempotent: re-closing an already-closed board
    /// still succeeds.
    pub async fn close_board(&self, id: BoardId, identity: &IdentityHash) -> AppResult<()> {
        let now = self.clock.now();
        match self.boards.close(id, identity, now).await? {
            UpdateOutcome::Applied => {
                self.broadcaster.board_closed(id, BoardClosed { board_id: id.to_string(), closed_at: now }).await;
                Ok(())
            }
            UpdateOutcome::NotMatched => match self.boards.find_by_id(id).await? {
                None => Err(AppError::not_found(NotFoundKind::Board)),
                Some(_) => Err(AppError::forbidden("admin")),
            },
        }
    }

    /// §4.1 `AddAdmin`. Creator-only; target must hold an active session.
    pub async fn add_admin(&self, id: BoardId, target: &IdentityHash, identity: &IdentityHash) -> AppResult<()> {
        let now = self.clock.now();
        let active = self.sessions.active_sessions(id, now, self.window_millis()).await?;
        if !active.iter().any(|s| &s.identity_hash == target) {
            return Err(AppError::validation("target has no active session on this board"));
        }
        match self.boards.add_admin(id, identity, target).await? {
            UpdateOutcome::Applied => Ok(()),
            UpdateOutcome::NotMatched => match self.boards.find_by_id(id).await? {
                None => Err(AppError::not_found(NotFoundKind::Board)),
                Some(_) => Err(AppError::forbidden("creator")),
            },
        }
    }

    /// §4.1 `DeleteBoard`. Cascade: reactions-of-cards → cards → sessions →
    /// board, each a separate bulk write; a failure partway through is
    /// surfaced, not rolled back (§4.1 "Failure & retry").
    pub async fn delete_board(&self, id: BoardId, auth: DeleteAuthorization<'_>) -> AppResult<()> {
        let board = self.boards.find_by_id(id).await?.ok_or_else(|| AppError::not_found(NotFoundKind::Board))?;
        let authorized = match auth {
            DeleteAuthorization::Identity(identity) => board.creator() == identity,
            DeleteAuthorization::AdminSecret(secret) => crate::admin::verify_secret(secret, &self.admin_secret),
        };
        if !authorized {
            return Err(AppError::forbidden("creator"));
        }

        self.reactions.delete_by_board(id).await?;
        self.cards.delete_by_board(id).await?;
        self.sessions.delete_by_board(id).await?;
        self.boards.delete(id).await?;

        self.broadcaster.board_deleted(id, BoardDeleted { board_id: id.to_string() }).await;
        Ok(())
    }
}

#[cfg(test)]
#[path = "board_service_test.rs"]
mod tests;
