//! Event payloads (§4.1–§4.3 "Events" lists). Each variant corresponds to
//! one wire frame `type`; `Event::kind()` gives that string and
//! `serde(flatten)`-free payloads keep the wire frame's `data` field a
//! plain object per event.

use serde::Serialize;

use crate::domain::Card;

#[derive(Debug, Clone, Serialize)]
pub struct BoardRenamed {
    pub board_id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ColumnRenamed {
    pub board_id: String,
    pub column_id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct BoardClosed {
    pub board_id: String,
    pub closed_at: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct BoardDeleted {
    pub board_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserJoined {
    pub board_id: String,
    pub identity_hash: String,
    pub alias: String,
    pub is_admin: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserAliasChanged {
    pub board_id: String,
    pub identity_hash: String,
    pub old_alias: String,
    pub new_alias: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CardCreated {
    pub card: Card,
}

#[derive(Debug, Clone, Serialize)]
pub struct CardUpdated {
    pub card: Card,
}

#[derive(Debug, Clone, Serialize)]
pub struct CardDeleted {
    pub board_id: String,
    pub card_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CardMoved {
    pub card_id: String,
    pub board_id: String,
    pub column_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CardLinked {
    pub board_id: String,
    pub source_id: String,
    pub target_id: String,
    pub kind: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CardUnlinked {
    pub board_id: String,
    pub source_id: String,
    pub target_id: String,
    pub kind: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReactionAdded {
    pub board_id: String,
    pub card_id: String,
    pub reaction_id: String,
    pub kind: String,
    pub identity_hash: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReactionRemoved {
    pub board_id: String,
    pub card_id: String,
    pub identity_hash: String,
}

/// Every event the gateway can fan out, tagged with its room (`board_id`)
/// and carrying the payload named in §4.1–§4.3.
///
/// `untagged` so serializing an `Event` produces just the inner payload
/// object — `Frame` is the only place the `type`/`data` envelope gets
/// written, via `Event::kind()` for the former and the payload itself for
/// the latter. A `tag`/`content` enum here would double up that envelope
/// once nested inside `Frame::data`.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Event {
    BoardRenamed(BoardRenamed),
    ColumnRenamed(ColumnRenamed),
    BoardClosed(BoardClosed),
    BoardDeleted(BoardDeleted),
    UserJoined(UserJoined),
    UserAliasChanged(UserAliasChanged),
    CardCreated(CardCreated),
    CardUpdated(CardUpdated),
    CardDeleted(CardDeleted),
    CardMoved(CardMoved),
    CardLinked(CardLinked),
    CardUnlinked(CardUnlinked),
    ReactionAdded(ReactionAdded),
    ReactionRemoved(ReactionRemoved),
}

impl Event {
    /// The `type` string written on the wire, also used for log fields.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::BoardRenamed(_) => "board:renamed",
            Self::ColumnRenamed(_) => "column:renamed",
            Self::BoardClosed(_) => "board:closed",
            Self::BoardDeleted(_) => "board:deleted",
            Self::UserJoined(_) => "user:joined",
            Self::UserAliasChanged(_) => "user:alias_changed",
            Self::CardCreated(_) => "card:created",
            Self::CardUpdated(_) => "card:updated",
            Self::CardDeleted(_) => "card:deleted",
            Self::CardMoved(_) => "card:moved",
            Self::CardLinked(_) => "card:linked",
            Self::CardUnlinked(_) => "card:unlinked",
            Self::ReactionAdded(_) => "reaction:added",
            Self::ReactionRemoved(_) => "reaction:removed",
        }
    }
}
