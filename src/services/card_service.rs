//! Card Service (component H) — §4.2.

use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::{Board, BoardId, Card, CardId, CardType, CardView, IdentityHash};
use crate::error::{AppError, AppResult, ConflictKind, LimitKind, NotFoundKind};
use crate::ports::store::{BoardStore, CardStore, ReactionStore, UpdateOutcome};
use crate::ports::Clock;
use crate::realtime::events::{CardCreated, CardDeleted, CardLinked, CardMoved, CardUnlinked, CardUpdated};
use crate::realtime::Broadcaster;

pub struct CreateCardInput {
    pub column_id: String,
    pub content: String,
    pub card_type: CardType,
    pub is_anonymous: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    ParentOf,
    LinkedTo,
}

impl LinkKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ParentOf => "parent_of",
            Self::LinkedTo => "linked_to",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CardFilter {
    pub column_id: Option<String>,
    pub card_type: Option<CardType>,
}

impl CardFilter {
    fn matches(&self, card: &Card) -> bool {
        self.column_id.as_deref().is_none_or(|c| c == card.column_id)
            && self.card_type.is_none_or(|t| t == card.card_type)
    }
}

#[derive(Debug, Clone)]
pub struct CardListResult {
    pub cards: Vec<CardView>,
    pub total_count: u32,
    pub cards_by_column: HashMap<String, u32>,
}

#[derive(Debug, Clone, Copy)]
pub struct CardQuota {
    pub current: u32,
    pub limit: Option<u32>,
    pub can_create: bool,
    pub limit_enabled: bool,
}

pub struct CardService {
    boards: Arc<dyn BoardStore>,
    cards: Arc<dyn CardStore>,
    reactions: Arc<dyn ReactionStore>,
    clock: Arc<dyn Clock>,
    broadcaster: Arc<dyn Broadcaster>,
    default_card_limit: Option<u32>,
}

impl CardService {
    #[must_use]
    pub fn new(
        boards: Arc<dyn BoardStore>,
        cards: Arc<dyn CardStore>,
        reactions: Arc<dyn ReactionStore>,
        clock: Arc<dyn Clock>,
        broadcaster: Arc<dyn Broadcaster>,
        default_card_limit: Option<u32>,
    ) -> Self {
        Self { boards, cards, reactions, clock, broadcaster, default_card_limit }
    }

    fn validate_content(content: &str) -> AppResult<()> {
        let len = content.chars().count();
        if !(1..=5000).contains(&len) {
            return Err(AppError::validation("card content must be 1..5000 chars"));
        }
        Ok(())
    }

    async fn require_active_board(&self, board_id: BoardId) -> AppResult<Board> {
        let board = self.boards.find_by_id(board_id).await?.ok_or_else(|| AppError::not_found(NotFoundKind::Board))?;
        if board.state.is_closed() {
            return Err(AppError::conflict(ConflictKind::BoardClosed));
        }
        Ok(board)
    }

    fn effective_card_limit(&self, board: &Board) -> Option<u32> {
        board.card_limit.or(self.default_card_limit)
    }

    /// §4.2 `CreateCard`.
    pub async fn create_card(
        &self,
        board_id: BoardId,
        input: CreateCardInput,
        identity: &IdentityHash,
        alias: &str,
    ) -> AppResult<Card> {
        Self::validate_content(&input.content)?;
        let board = self.require_active_board(board_id).await?;
        if !board.has_column(&input.column_id) {
            return Err(AppError::not_found(NotFoundKind::Column));
        }

        if matches!(input.card_type, CardType::Feedback) {
            if let Some(limit) = self.effective_card_limit(&board) {
                let current = self.cards.count_feedback_by_identity(board_id, identity).await?;
                if current >= limit {
                    return Err(AppError::limit_exceeded(LimitKind::CardLimit, current, limit));
                }
            }
        }

        let now = self.clock.now();
        let card = Card {
            id: CardId::new(),
            board_id,
            column_id: input.column_id,
            content: input.content,
            card_type: input.card_type,
            is_anonymous: input.is_anonymous,
            created_by_hash: identity.clone(),
            created_by_alias: if input.is_anonymous { None } else { Some(alias.to_string()) },
            created_at: now,
            direct_count: 0,
            aggregated_count: 0,
            parent_id: None,
            linked_feedback_ids: Vec::new(),
        };
        self.cards.insert(&card).await?;
        self.broadcaster.card_created(board_id, CardCreated { card: card.clone() }).await;
        Ok(card)
    }

    async fn require_card(&self, id: CardId) -> AppResult<Card> {
        self.cards.find_by_id(id).await?.ok_or_else(|| AppError::not_found(NotFoundKind::Card))
    }

    fn require_creator(card: &Card, identity: &IdentityHash) -> AppResult<()> {
        if &card.created_by_hash != identity {
            return Err(AppError::forbidden("creator"));
        }
        Ok(())
    }

    /// §4.2 `UpdateCard`. Creator-only; fails on a closed board.
    pub async fn update_card(&self, id: CardId, content: &str, identity: &IdentityHash) -> AppResult<Card> {
        Self::validate_content(content)?;
        let card = self.require_card(id).await?;
        Self::require_creator(&card, identity)?;
        self.require_active_board(card.board_id).await?;

        match self.cards.update_content(id, content).await? {
            UpdateOutcome::Applied => {
                let updated = Card { content: content.to_string(), ..card };
                self.broadcaster.card_updated(updated.board_id, CardUpdated { card: updated.clone() }).await;
                Ok(updated)
            }
            UpdateOutcome::NotMatched => Err(AppError::not_found(NotFoundKind::Card)),
        }
    }

    /// §4.2 `MoveCard`. Creator-only; new column must exist on the card's
    /// board. Parent-child links are untouched.
    pub async fn move_card(&self, id: CardId, new_column_id: &str, identity: &IdentityHash) -> AppResult<()> {
        let card = self.require_card(id).await?;
        Self::require_creator(&card, identity)?;
        let board = self.require_active_board(card.board_id).await?;
        if !board.has_column(new_column_id) {
            return Err(AppError::not_found(NotFoundKind::Column));
        }

        match self.cards.update_column(id, new_column_id).await? {
            UpdateOutcome::Applied => {
                self.broadcaster
                    .card_moved(
                        card.board_id,
                        CardMoved { card_id: id.to_string(), board_id: card.board_id.to_string(), column_id: new_column_id.to_string() },
                    )
                    .await;
                Ok(())
            }
            UpdateOutcome::NotMatched => Err(AppError::not_found(NotFoundKind::Card)),
        }
    }

    /// §4.2 `DeleteCard`. Creator-only. Every step is attempted even if an
    /// earlier one fails; the first error is what's reported.
    pub async fn delete_card(&self, id: CardId, identity: &IdentityHash) -> AppResult<()> {
        let card = self.require_card(id).await?;
        Self::require_creator(&card, identity)?;

        let mut first_error: Option<AppError> = None;

        if let Err(e) = self.cards.orphan_children(id).await {
            first_error.get_or_insert(e.into());
        }
        if let Some(parent_id) = card.parent_id {
            if let Err(e) = self.cards.adjust_aggregated_count(parent_id, -i64::from(card.direct_count)).await {
                first_error.get_or_insert(e.into());
            }
        }
        if let Err(e) = self.reactions.delete_by_card(id).await {
            first_error.get_or_insert(e.into());
        }
        let deleted = match self.cards.delete(id).await {
            Ok(count) => count > 0,
            Err(e) => {
                first_error.get_or_insert(e.into());
                false
            }
        };

        if deleted {
            self.broadcaster
                .card_deleted(card.board_id, CardDeleted { board_id: card.board_id.to_string(), card_id: id.to_string() })
                .await;
        }

        first_error.map_or(Ok(()), Err)
    }

    async fn authorize_link(&self, source: &Card, identity: &IdentityHash) -> AppResult<Board> {
        let board = self.require_active_board(source.board_id).await?;
        if &source.created_by_hash != identity && !board.is_admin(identity) {
            return Err(AppError::forbidden("creator_or_admin"));
        }
        Ok(board)
    }

    /// Defensive ancestor walk (§9 Design Notes): at today's depth-1 cap
    /// this only ever takes one hop, but the loop holds if the depth rule
    /// is ever relaxed.
    async fn is_ancestor(&self, candidate_ancestor: CardId, node: CardId) -> AppResult<bool> {
        let mut current = node;
        loop {
            let Some(card) = self.cards.find_by_id(current).await? else {
                return Ok(false);
            };
            match card.parent_id {
                Some(parent) if parent == candidate_ancestor => return Ok(true),
                Some(parent) => current = parent,
                None => return Ok(false),
            }
        }
    }

    /// §4.2 `LinkCards`.
    pub async fn link_cards(&self, source_id: CardId, target_id: CardId, kind: LinkKind, identity: &IdentityHash) -> AppResult<()> {
        let source = self.require_card(source_id).await?;
        let target = self.require_card(target_id).await?;
        self.authorize_link(&source, identity).await?;

        if source.board_id != target.board_id {
            return Err(AppError::validation("cards must belong to the same board"));
        }

        match kind {
            LinkKind::ParentOf => {
                if !source.is_feedback() || !target.is_feedback() {
                    return Err(AppError::validation("parent_of links require two feedback cards"));
                }
                if source_id == target_id {
                    return Err(AppError::conflict(ConflictKind::CircularRelationship));
                }
                if source.has_parent() {
                    return Err(AppError::validation("source card already has a parent"));
                }
                if target.has_parent() {
                    return Err(AppError::validation("target card already has a parent"));
                }
                if self.is_ancestor(source_id, target_id).await? {
                    return Err(AppError::conflict(ConflictKind::CircularRelationship));
                }

                self.cards.set_parent(target_id, Some(source_id)).await?;
                self.cards.adjust_aggregated_count(source_id, i64::from(target.direct_count)).await?;
            }
            LinkKind::LinkedTo => {
                if !source.is_action() || !target.is_feedback() {
                    return Err(AppError::validation("linked_to requires an action source and a feedback target"));
                }
                self.cards.add_linked_feedback(source_id, target_id).await?;
            }
        }

        self.broadcaster
            .card_linked(
                source.board_id,
                CardLinked {
                    board_id: source.board_id.to_string(),
                    source_id: source_id.to_string(),
                    target_id: target_id.to_string(),
                    kind: kind.as_str().to_string(),
                },
            )
            .await;
        Ok(())
    }

    /// §4.2 `UnlinkCards`.
    pub async fn unlink_cards(&self, source_id: CardId, target_id: CardId, kind: LinkKind, identity: &IdentityHash) -> AppResult<()> {
        let source = self.require_card(source_id).await?;
        let target = self.require_card(target_id).await?;
        self.authorize_link(&source, identity).await?;

        match kind {
            LinkKind::ParentOf => {
                if target.parent_id != Some(source_id) {
                    return Err(AppError::validation("target card is not a child of source"));
                }
                self.cards.set_parent(target_id, None).await?;
                self.cards.adjust_aggregated_count(source_id, -i64::from(target.direct_count)).await?;
            }
            LinkKind::LinkedTo => {
                if !source.linked_feedback_ids.contains(&target_id) {
                    return Err(AppError::validation("target card is not linked to source"));
                }
                self.cards.remove_linked_feedback(source_id, target_id).await?;
            }
        }

        self.broadcaster
            .card_unlinked(
                source.board_id,
                CardUnlinked {
                    board_id: source.board_id.to_string(),
                    source_id: source_id.to_string(),
                    target_id: target_id.to_string(),
                    kind: kind.as_str().to_string(),
                },
            )
            .await;
        Ok(())
    }

    /// §4.2 `ListCards`. Children and linked-feedback are resolved from the
    /// single board-wide fetch already in hand, not an N+1 per card.
    pub async fn list_cards(&self, board_id: BoardId, filter: &CardFilter, include_relationships: bool) -> AppResult<CardListResult> {
        let all = self.cards.list_by_board(board_id).await?;
        let by_id: HashMap<CardId, Card> = all.iter().map(|c| (c.id, c.clone())).collect();
        let mut children_of: HashMap<CardId, Vec<Card>> = HashMap::new();
        for card in &all {
            if let Some(parent) = card.parent_id {
                children_of.entry(parent).or_default().push(card.clone());
            }
        }
        for children in children_of.values_mut() {
            children.sort_by_key(|c| c.created_at);
        }

        let mut cards_by_column: HashMap<String, u32> = HashMap::new();
        let mut views = Vec::new();
        for card in all.iter().filter(|c| filter.matches(c)) {
            *cards_by_column.entry(card.column_id.clone()).or_insert(0) += 1;
            let (children, linked_feedback_cards) = if include_relationships {
                let children = children_of.get(&card.id).cloned().unwrap_or_default();
                let linked = card.linked_feedback_ids.iter().filter_map(|id| by_id.get(id).cloned()).collect();
                (children, linked)
            } else {
                (Vec::new(), Vec::new())
            };
            views.push(CardView { card: card.clone(), children, linked_feedback_cards });
        }

        let total_count = u32::try_from(views.len()).unwrap_or(u32::MAX);
        Ok(CardListResult { cards: views, total_count, cards_by_column })
    }

    /// §4.2 `GetCard`.
    pub async fn get_card(&self, id: CardId, include_relationships: bool) -> AppResult<CardView> {
        let card = self.require_card(id).await?;
        let (children, linked_feedback_cards) = if include_relationships {
            let children = self.cards.find_children(id).await?;
            let linked = self.cards.find_many(&card.linked_feedback_ids).await?;
            (children, linked)
        } else {
            (Vec::new(), Vec::new())
        };
        Ok(CardView { card, children, linked_feedback_cards })
    }

    /// §4.2 `CheckCardQuota`.
    pub async fn check_card_quota(&self, board_id: BoardId, identity: &IdentityHash) -> AppResult<CardQuota> {
        let board = self.boards.find_by_id(board_id).await?.ok_or_else(|| AppError::not_found(NotFoundKind::Board))?;
        let limit = self.effective_card_limit(&board);
        let current = self.cards.count_feedback_by_identity(board_id, identity).await?;
        Ok(CardQuota {
            current,
            limit,
            can_create: limit.is_none_or(|l| current < l),
            limit_enabled: limit.is_some(),
        })
    }
}

#[cfg(test)]
#[path = "card_service_test.rs"]
mod tests;
