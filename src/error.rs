//! Error taxonomy (§7). Stores return the most primitive kind; services
//! refine. No kind silently becomes another.

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotFoundKind {
    Board,
    Card,
    Column,
    User,
    Reaction,
}

impl NotFoundKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Board => "board",
            Self::Card => "card",
            Self::Column => "column",
            Self::User => "user",
            Self::Reaction => "reaction",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictKind {
    BoardClosed,
    CircularRelationship,
    DuplicateKey,
}

impl ConflictKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::BoardClosed => "board_closed",
            Self::CircularRelationship => "circular_relationship",
            Self::DuplicateKey => "duplicate_key",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitKind {
    CardLimit,
    ReactionLimit,
}

impl LimitKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CardLimit => "card_limit",
            Self::ReactionLimit => "reaction_limit",
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("validation: {0}")]
    Validation(String),

    #[error("unauthenticated")]
    Unauthenticated,

    #[error("forbidden: {required_role} required")]
    Forbidden { required_role: &'static str },

    #[error("not found: {kind:?}")]
    NotFound { kind: NotFoundKind },

    #[error("conflict: {kind:?}")]
    Conflict { kind: ConflictKind },

    #[error("limit exceeded: {kind:?} current={current} limit={limit}")]
    LimitExceeded { kind: LimitKind, current: u32, limit: u32 },

    #[error("rate limited")]
    RateLimited,

    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    #[must_use]
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    #[must_use]
    pub fn not_found(kind: NotFoundKind) -> Self {
        Self::NotFound { kind }
    }

    #[must_use]
    pub fn conflict(kind: ConflictKind) -> Self {
        Self::Conflict { kind }
    }

    #[must_use]
    pub fn forbidden(required_role: &'static str) -> Self {
        Self::Forbidden { required_role }
    }

    #[must_use]
    pub fn limit_exceeded(kind: LimitKind, current: u32, limit: u32) -> Self {
        Self::LimitExceeded { kind, current, limit }
    }

    /// Grepable error code, analogous to the reference server's `ErrorCode`
    /// trait — used in logs and in the peripheral HTTP error body.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "E_VALIDATION",
            Self::Unauthenticated => "E_UNAUTHENTICATED",
            Self::Forbidden { .. } => "E_FORBIDDEN",
            Self::NotFound { kind } => match kind {
                NotFoundKind::Board => "E_BOARD_NOT_FOUND",
                NotFoundKind::Card => "E_CARD_NOT_FOUND",
                NotFoundKind::Column => "E_COLUMN_NOT_FOUND",
                NotFoundKind::User => "E_USER_NOT_FOUND",
                NotFoundKind::Reaction => "E_REACTION_NOT_FOUND",
            },
            Self::Conflict { kind } => match kind {
                ConflictKind::BoardClosed => "E_BOARD_CLOSED",
                ConflictKind::CircularRelationship => "E_CIRCULAR_RELATIONSHIP",
                ConflictKind::DuplicateKey => "E_DUPLICATE_KEY",
            },
            Self::LimitExceeded { kind, .. } => match kind {
                LimitKind::CardLimit => "E_CARD_LIMIT",
                LimitKind::ReactionLimit => "E_REACTION_LIMIT",
            },
            Self::RateLimited => "E_RATE_LIMITED",
            Self::Internal(_) => "E_INTERNAL",
        }
    }
}

/// Store-level error: the most primitive kind a Persistence port adapter can
/// report. Services convert this to `AppError`, refining where they have
/// enough context (e.g. a zero-matched conditional update is re-read and
/// reclassified, never surfaced as `Internal` directly).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("duplicate key")]
    DuplicateKey,
    #[error("backend error: {0}")]
    Backend(String),
}

impl From<mongodb::error::Error> for StoreError {
    fn from(err: mongodb::error::Error) -> Self {
        if is_duplicate_key(&err) {
            Self::DuplicateKey
        } else {
            Self::Backend(err.to_string())
        }
    }
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    use mongodb::error::ErrorKind;
    matches!(err.kind.as_ref(), ErrorKind::Write(mongodb::error::WriteFailure::WriteError(we)) if we.code == 11000)
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateKey => Self::conflict(ConflictKind::DuplicateKey),
            StoreError::Backend(msg) => {
                tracing::error!(error = %msg, "persistence backend error");
                Self::Internal("persistence backend error".into())
            }
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
pub type StoreResult<T> = Result<T, StoreError>;
