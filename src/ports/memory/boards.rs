//! In-memory `BoardStore` test adapter.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::{Board, BoardId, BoardLifecycle, IdentityHash, ShareableLink, Timestamp};
use crate::error::{StoreError, StoreResult};
use crate::ports::store::{BoardStore, UpdateOutcome};

#[derive(Default)]
pub struct MemoryBoardStore {
    boards: Mutex<HashMap<BoardId, Board>>,
}

impl MemoryBoardStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BoardStore for MemoryBoardStore {
    async fn insert(&self, board: &Board) -> StoreResult<()> {
        let mut boards = self.boards.lock().unwrap();
        if boards.values().any(|b| b.shareable_link == board.shareable_link) {
            return Err(StoreError::DuplicateKey);
        }
        boards.insert(board.id, board.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: BoardId) -> StoreResult<Option<Board>> {
        Ok(self.boards.lock().unwrap().get(&id).cloned())
    }

    async fn find_by_shareable_link(&self, link: &ShareableLink) -> StoreResult<Option<Board>> {
        Ok(self.boards.lock().unwrap().values().find(|b| &b.shareable_link == link).cloned())
    }

    async fn rename(&self, id: BoardId, new_name: &str, identity: &IdentityHash) -> StoreResult<UpdateOutcome> {
        let mut boards = self.boards.lock().unwrap();
        let Some(board) = boards.get_mut(&id) else {
            return Ok(UpdateOutcome::NotMatched);
        };
        if board.state.is_closed() || !board.is_admin(identity) {
            return Ok(UpdateOutcome::NotMatched);
        }
        board.name = new_name.to_string();
        Ok(UpdateOutcome::Applied)
    }

    async fn rename_column(
        &self,
        id: BoardId,
        column_id: &str,
        new_name: &str,
        identity: &IdentityHash,
    ) -> StoreResult<UpdateOutcome> {
        let mut boards = self.boards.lock().unwrap();
        let Some(board) = boards.get_mut(&id) else {
            return Ok(UpdateOutcome::NotMatched);
        };
        if board.state.is_closed() || !board.is_admin(identity) {
            return Ok(UpdateOutcome::NotMatched);
        }
        let Some(column) = board.columns.iter_mut().find(|c| c.id == column_id) else {
            return Ok(UpdateOutcome::NotMatched);
        };
        column.name = new_name.to_string();
        Ok(UpdateOutcome::Applied)
    }

    async fn close(&self, id: BoardId, identity: &IdentityHash, closed_at: Timestamp) -> StoreResult<UpdateOutcome> {
        let mut boards = self.boards.lock().unwrap();
        let Some(board) = boards.get_mut(&id) else {
            return Ok(UpdateOutcome::NotMatched);
        };
        if !board.is_admin(identity) {
            return Ok(UpdateOutcome::NotMatched);
        }
        if board.state.is_closed() {
            return Ok(UpdateOutcome::Applied);
        }
        board.state = BoardLifecycle::Closed;
        board.closed_at = Some(closed_at);
        Ok(UpdateOutcome::Applied)
    }

    async fn add_admin(&self, id: BoardId, identity: &IdentityHash, target: &IdentityHash) -> StoreResult<UpdateOutcome> {
        let mut boards = self.boards.lock().unwrap();
        let Some(board) = boards.get_mut(&id) else {
            return Ok(UpdateOutcome::NotMatched);
        };
        if board.creator() != identity {
            return Ok(UpdateOutcome::NotMatched);
        }
        if !board.admins.contains(target) {
            board.admins.push(target.clone());
        }
        Ok(UpdateOutcome::Applied)
    }

    async fn delete(&self, id: BoardId) -> StoreResult<u64> {
        Ok(u64::from(self.boards.lock().unwrap().remove(&id).is_some()))
    }
}
