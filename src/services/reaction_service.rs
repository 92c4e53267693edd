//! Reaction Service (component I) — §4.3.

use std::sync::Arc;

use crate::domain::{BoardId, CardId, IdentityHash, Reaction, ReactionKind};
use crate::error::{AppError, AppResult, ConflictKind, LimitKind, NotFoundKind};
use crate::ports::store::{BoardStore, CardStore, ReactionStore};
use crate::ports::Clock;
use crate::realtime::events::{ReactionAdded, ReactionRemoved};
use crate::realtime::Broadcaster;

#[derive(Debug, Clone, Copy)]
pub struct ReactionQuota {
    pub current: u32,
    pub limit: Option<u32>,
    pub can_react: bool,
    pub limit_enabled: bool,
}

pub struct ReactionService {
    boards: Arc<dyn BoardStore>,
    cards: Arc<dyn CardStore>,
    reactions: Arc<dyn ReactionStore>,
    clock: Arc<dyn Clock>,
    broadcaster: Arc<dyn Broadcaster>,
    default_reaction_limit: Option<u32>,
}

impl ReactionService {
    #[must_use]
    pub fn new(
        boards: Arc<dyn BoardStore>,
        cards: Arc<dyn CardStore>,
        reactions: Arc<dyn ReactionStore>,
        clock: Arc<dyn Clock>,
        broadcaster: Arc<dyn Broadcaster>,
        default_reaction_limit: Option<u32>,
    ) -> Self {
        Self { boards, cards, reactions, clock, broadcaster, default_reaction_limit }
    }

    fn effective_reaction_limit(&self, board_limit: Option<u32>) -> Option<u32> {
        board_limit.or(self.default_reaction_limit)
    }

    /// §4.3 `AddReaction`. Only a newly-inserted reaction moves counters;
    /// re-reacting with a different `kind` updates the row in place.
    pub async fn add_reaction(
        &self,
        card_id: CardId,
        kind: ReactionKind,
        identity: &IdentityHash,
        alias: &str,
    ) -> AppResult<Reaction> {
        let card = self.cards.find_by_id(card_id).await?.ok_or_else(|| AppError::not_found(NotFoundKind::Card))?;
        let board = self.boards.find_by_id(card.board_id).await?.ok_or_else(|| AppError::not_found(NotFoundKind::Board))?;
        if board.state.is_closed() {
            return Err(AppError::conflict(ConflictKind::BoardClosed));
        }

        let existing = self.reactions.find_one(card_id, identity).await?;
        if existing.is_none() {
            if let Some(limit) = self.effective_reaction_limit(board.reaction_limit) {
                let current = self.reactions.count_by_board_and_identity(card.board_id, identity).await?;
                if current >= limit {
                    return Err(AppError::limit_exceeded(LimitKind::ReactionLimit, current, limit));
                }
            }
        }

        let now = self.clock.now();
        let (reaction, was_insert) = self.reactions.upsert(card_id, identity, alias, &kind, now).await?;

        if was_insert {
            self.cards.adjust_direct_count(card_id, 1).await?;
            if let Some(parent_id) = card.parent_id {
                self.cards.adjust_aggregated_count(parent_id, 1).await?;
            }
        }

        self.broadcaster
            .reaction_added(
                card.board_id,
                ReactionAdded {
                    board_id: card.board_id.to_string(),
                    card_id: card_id.to_string(),
                    reaction_id: reaction.id.to_string(),
                    kind: reaction.kind.as_str().to_string(),
                    identity_hash: identity.to_string(),
                },
            )
            .await;
        Ok(reaction)
    }

    /// §4.3 `RemoveReaction`.
    pub async fn remove_reaction(&self, card_id: CardId, identity: &IdentityHash) -> AppResult<()> {
        let card = self.cards.find_by_id(card_id).await?.ok_or_else(|| AppError::not_found(NotFoundKind::Card))?;

        if !self.reactions.delete_one(card_id, identity).await? {
            return Err(AppError::not_found(NotFoundKind::Reaction));
        }

        self.cards.adjust_direct_count(card_id, -1).await?;
        if let Some(parent_id) = card.parent_id {
            self.cards.adjust_aggregated_count(parent_id, -1).await?;
        }

        self.broadcaster
            .reaction_removed(
                card.board_id,
                ReactionRemoved { board_id: card.board_id.to_string(), card_id: card_id.to_string(), identity_hash: identity.to_string() },
            )
            .await;
        Ok(())
    }

    /// §4.3 `CheckReactionQuota`. Counted per board, over `reactions ⋈ cards`.
    pub async fn check_reaction_quota(&self, board_id: BoardId, identity: &IdentityHash) -> AppResult<ReactionQuota> {
        let board = self.boards.find_by_id(board_id).await?.ok_or_else(|| AppError::not_found(NotFoundKind::Board))?;
        let limit = self.effective_reaction_limit(board.reaction_limit);
        let current = self.reactions.count_by_board_and_identity(board_id, identity).await?;
        Ok(ReactionQuota {
            current,
            limit,
            can_react: limit.is_none_or(|l| current < l),
            limit_enabled: limit.is_some(),
        })
    }
}

#[cfg(test)]
#[path = "reaction_service_test.rs"]
mod tests;
