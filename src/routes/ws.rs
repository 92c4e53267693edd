//! WebSocket route — the Subscription Gateway's transport (§4.5).
//!
//! On upgrade, resolves identity from the same cookie mechanism as the
//! mutation path, registers a subscriber, then enters a `select!` loop:
//! inbound `join-board`/`leave-board`/`heartbeat` commands update room
//! membership and presence, while frames enqueued by the Broadcaster are
//! forwarded out to the socket as they arrive.

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use tracing::warn;

use crate::domain::BoardId;
use crate::realtime::Frame;
use crate::state::AppState;

use super::identity::Identity;

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
enum ClientCommand {
    JoinBoard { board_id: String },
    LeaveBoard,
    Heartbeat,
}

/// `GET /ws`
pub async fn handle_ws(state: State<AppState>, Identity(identity): Identity, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| run_ws(socket, state.0, identity))
}

async fn run_ws(mut socket: WebSocket, state: AppState, identity_hash: crate::domain::IdentityHash) {
    let connected_at = state.clock.now();
    let (subscriber_id, mut receiver) = state.gateway.connect(identity_hash.clone(), connected_at).await;
    let mut current_board: Option<BoardId> = None;

    loop {
        tokio::select! {
            msg = socket.recv() => {
                let Some(Ok(msg)) = msg else { break };
                match msg {
                    Message::Text(text) => {
                        handle_command(&state, &mut current_board, subscriber_id, &identity_hash, &text).await;
                    }
                    Message::Close(_) => break,
                    _ => {}
                }
            }
            Some(frame) = receiver.recv() => {
                if send_frame(&mut socket, &frame).await.is_err() {
                    break;
                }
            }
        }
    }

    state.gateway.disconnect(subscriber_id).await;
}

async fn handle_command(
    state: &AppState,
    current_board: &mut Option<BoardId>,
    subscriber_id: uuid::Uuid,
    identity_hash: &crate::domain::IdentityHash,
    text: &str,
) {
    let command: ClientCommand = match serde_json::from_str(text) {
        Ok(command) => command,
        Err(e) => {
            warn!(%subscriber_id, error = %e, "ws: invalid inbound command");
            return;
        }
    };

    match command {
        ClientCommand::JoinBoard { board_id } => {
            let Ok(board_id) = board_id.parse::<BoardId>() else {
                warn!(%subscriber_id, %board_id, "ws: invalid board id in join-board");
                return;
            };
            if state.gateway.join_board(subscriber_id, board_id).await {
                *current_board = Some(board_id);
            }
        }
        ClientCommand::LeaveBoard => {
            state.gateway.leave_board(subscriber_id).await;
            *current_board = None;
        }
        ClientCommand::Heartbeat => {
            if let Some(board_id) = *current_board {
                let _ = state.presence.heartbeat(board_id, identity_hash).await;
            }
        }
    }
}

async fn send_frame(socket: &mut WebSocket, frame: &Frame) -> Result<(), axum::Error> {
    let text = frame.to_json().unwrap_or_else(|_| "{}".to_string());
    socket.send(Message::Text(text.into())).await
}
