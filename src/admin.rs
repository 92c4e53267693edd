//! Administrative back channel (§6 "Administrative back channel").
//!
//! Gated by nothing but possession of a preshared secret, compared in
//! constant time and padded to a fixed length so neither the secret's
//! presence nor its length leaks via timing.

use std::sync::Arc;

use subtle::ConstantTimeEq;

use crate::domain::{Board, BoardId};
use crate::error::{AppError, AppResult, NotFoundKind};
use crate::ports::store::{BoardStore, CardStore, ReactionStore, SessionStore};
use crate::ports::Clock;

/// Fixed comparison length both operands are padded to, so `secret.len()`
/// cannot be inferred from how long the comparison takes.
const COMPARISON_PAD_LEN: usize = 256;

fn pad(value: &str) -> [u8; COMPARISON_PAD_LEN] {
    let mut buf = [0u8; COMPARISON_PAD_LEN];
    let bytes = value.as_bytes();
    let n = bytes.len().min(COMPARISON_PAD_LEN);
    buf[..n].copy_from_slice(&bytes[..n]);
    buf
}

/// Constant-time equality, independent of `provided`'s or `secret`'s length.
#[must_use]
pub fn verify_secret(provided: &str, secret: &str) -> bool {
    pad(provided).ct_eq(&pad(secret)).into()
}

/// A board freshly constructed by `SeedBoard`, mirroring `CreateBoard`'s
/// shape but bypassing normal authorization — the admin secret is the only
/// gate.
#[derive(Debug, Clone)]
pub struct SeedPlan {
    pub name: String,
    pub columns: Vec<crate::domain::Column>,
    pub card_limit: Option<u32>,
    pub reaction_limit: Option<u32>,
    pub creator_hash: crate::domain::IdentityHash,
    pub shareable_link: crate::domain::ShareableLink,
}

/// Post-deployment verification surface: wipe a board's content, reset it
/// to a blank active board, or seed one outright — all bypassing normal
/// per-operation authorization, since the secret itself is the gate.
pub struct AdminChannel {
    boards: Arc<dyn BoardStore>,
    cards: Arc<dyn CardStore>,
    reactions: Arc<dyn ReactionStore>,
    sessions: Arc<dyn SessionStore>,
    clock: Arc<dyn Clock>,
    secret: String,
}

impl AdminChannel {
    #[must_use]
    pub fn new(
        boards: Arc<dyn BoardStore>,
        cards: Arc<dyn CardStore>,
        reactions: Arc<dyn ReactionStore>,
        sessions: Arc<dyn SessionStore>,
        clock: Arc<dyn Clock>,
        secret: String,
    ) -> Self {
        Self { boards, cards, reactions, sessions, clock, secret }
    }

    #[must_use]
    pub fn authorize(&self, provided: &str) -> bool {
        verify_secret(provided, &self.secret)
    }

    /// Deletes every card, reaction, and session for a board, leaving the
    /// board document itself intact. Same cascade order as `DeleteBoard`
    /// minus the final board delete.
    pub async fn clear_board_data(&self, board_id: BoardId) -> AppResult<()> {
        self.reactions.delete_by_board(board_id).await?;
        self.cards.delete_by_board(board_id).await?;
        self.sessions.delete_by_board(board_id).await?;
        Ok(())
    }

    /// `ClearBoardData` plus reopening the board if it was closed.
    pub async fn reset_board(&self, board_id: BoardId) -> AppResult<()> {
        self.clear_board_data(board_id).await?;
        let board = self.boards.find_by_id(board_id).await?.ok_or_else(|| AppError::not_found(NotFoundKind::Board))?;
        if board.state.is_closed() {
            // Reopening bypasses the normal one-way `active -> closed`
            // transition (invariant 6); the admin channel is explicitly
            // exempt from service-level authorization, not from this
            // invariant's spirit, so this is scoped to verification use.
            let reopened = Board { state: crate::domain::BoardLifecycle::Active, closed_at: None, ..board };
            self.boards.delete(board_id).await?;
            self.boards.insert(&reopened).await?;
        }
        Ok(())
    }

    /// Inserts a brand-new board from a fully-formed plan, bypassing
    /// `CreateBoard`'s shareable-link retry loop (the caller is expected to
    /// have already picked a link known to be free, or to retry itself).
    pub async fn seed_board(&self, plan: SeedPlan) -> AppResult<Board> {
        let now = self.clock.now();
        let board = Board {
            id: BoardId::new(),
            name: plan.name,
            columns: plan.columns,
            admins: vec![plan.creator_hash.clone()],
            state: crate::domain::BoardLifecycle::Active,
            closed_at: None,
            card_limit: plan.card_limit,
            reaction_limit: plan.reaction_limit,
            creator_hash: plan.creator_hash,
            shareable_link: plan.shareable_link,
            created_at: now,
        };
        self.boards.insert(&board).await?;
        Ok(board)
    }
}

#[cfg(test)]
#[path = "admin_test.rs"]
mod tests;
