//! Subscription Gateway (component L) — room registry, join/leave, and
//! broadcast fan-out (§4.5).

use std::collections::{HashMap, HashSet};

use tokio::sync::{mpsc, RwLock};
use uuid::Uuid;

use crate::domain::{BoardId, IdentityHash, Timestamp};
use crate::ports::Clock;

use super::events::Event;
use super::frame::Frame;

struct SubscriberEntry {
    identity_hash: IdentityHash,
    current_board_id: Option<BoardId>,
    connected_at: Timestamp,
    sender: mpsc::Sender<Frame>,
}

/// In-process room registry (§5 "room registry is shared mutable state").
/// `rooms` and `subscribers` are guarded independently; `broadcast` only
/// ever takes a read lock on `subscribers`, so slow subscriber sends never
/// block `join_board`/`leave_board`/`disconnect` on other connections.
pub struct Gateway {
    rooms: RwLock<HashMap<BoardId, HashSet<Uuid>>>,
    subscribers: RwLock<HashMap<Uuid, SubscriberEntry>>,
    send_queue_capacity: usize,
}

impl Gateway {
    #[must_use]
    pub fn new(send_queue_capacity: usize) -> Self {
        Self { rooms: RwLock::new(HashMap::new()), subscribers: RwLock::new(HashMap::new()), send_queue_capacity }
    }

    /// Registers a new subscriber connection, not yet in any room. Returns
    /// its id and the receiving half of its bounded send-queue.
    pub async fn connect(&self, identity_hash: IdentityHash, connected_at: Timestamp) -> (Uuid, mpsc::Receiver<Frame>) {
        let (sender, receiver) = mpsc::channel(self.send_queue_capacity);
        let subscriber_id = Uuid::new_v4();
        let entry = SubscriberEntry { identity_hash, current_board_id: None, connected_at, sender };
        self.subscribers.write().await.insert(subscriber_id, entry);
        (subscriber_id, receiver)
    }

    /// `join-board`: moves the subscriber out of any prior room and into
    /// `board_id`. Returns `false` if the subscriber is unknown (already
    /// disconnected).
    pub async fn join_board(&self, subscriber_id: Uuid, board_id: BoardId) -> bool {
        let mut subscribers = self.subscribers.write().await;
        let Some(entry) = subscribers.get_mut(&subscriber_id) else {
            return false;
        };
        let previous = entry.current_board_id.replace(board_id);
        drop(subscribers);

        let mut rooms = self.rooms.write().await;
        if let Some(prev_board) = previous {
            if let Some(members) = rooms.get_mut(&prev_board) {
                members.remove(&subscriber_id);
            }
        }
        rooms.entry(board_id).or_default().insert(subscriber_id);
        true
    }

    /// `leave-board`: removes the subscriber from its current room, if any.
    pub async fn leave_board(&self, subscriber_id: Uuid) {
        let mut subscribers = self.subscribers.write().await;
        let Some(entry) = subscribers.get_mut(&subscriber_id) else {
            return;
        };
        let Some(board_id) = entry.current_board_id.take() else {
            return;
        };
        drop(subscribers);

        if let Some(members) = self.rooms.write().await.get_mut(&board_id) {
            members.remove(&subscriber_id);
        }
    }

    /// Disconnect: remove the subscriber from its room and the registry
    /// entirely. Per §4.5, this never itself emits `user:left` — presence
    /// ages the session out of the 120s window instead.
    pub async fn disconnect(&self, subscriber_id: Uuid) {
        let board_id = {
            let mut subscribers = self.subscribers.write().await;
            subscribers.remove(&subscriber_id).and_then(|e| e.current_board_id)
        };
        if let Some(board_id) = board_id {
            if let Some(members) = self.rooms.write().await.get_mut(&board_id) {
                members.remove(&subscriber_id);
            }
        }
    }

    /// Enqueues `event` as a [`Frame`] to every subscriber currently in
    /// `board_id`'s room. A subscriber whose send-queue is full has the
    /// frame dropped for it and a warning logged — others are unaffected
    /// (§4.5 "slow consumers lose events").
    pub async fn broadcast(&self, board_id: BoardId, event: Event, clock: &dyn Clock) {
        let frame = Frame::new(event, clock);
        let Some(member_ids) = self.rooms.read().await.get(&board_id).map(|m| m.iter().copied().collect::<Vec<_>>())
        else {
            return;
        };
        let subscribers = self.subscribers.read().await;
        for subscriber_id in member_ids {
            let Some(entry) = subscribers.get(&subscriber_id) else { continue };
            if let Err(mpsc::error::TrySendError::Full(_)) = entry.sender.try_send(frame.clone()) {
                tracing::warn!(
                    board_id = %board_id,
                    subscriber_id = %subscriber_id,
                    event = frame.kind,
                    "dropping frame for slow consumer"
                );
            }
        }
    }

    /// Total registered subscribers, for diagnostics/tests only.
    #[must_use]
    pub async fn subscriber_count(&self) -> usize {
        self.subscribers.read().await.len()
    }

    /// Room membership size, for tests asserting fan-out scope (§8 scenario 4).
    #[must_use]
    pub async fn room_size(&self, board_id: BoardId) -> usize {
        self.rooms.read().await.get(&board_id).map_or(0, HashSet::len)
    }

    /// The identity a subscriber connected as, and when — used by the
    /// Presence Service to attribute `join-board`/`heartbeat` commands
    /// arriving over an already-authenticated socket.
    #[must_use]
    pub async fn identity_of(&self, subscriber_id: Uuid) -> Option<(IdentityHash, Timestamp)> {
        self.subscribers.read().await.get(&subscriber_id).map(|e| (e.identity_hash.clone(), e.connected_at))
    }
}

#[cfg(test)]
#[path = "gateway_test.rs"]
mod tests;
