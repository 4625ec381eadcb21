//! WebSocket handler — one channel per connected control or display page.
//!
//! DESIGN
//! ======
//! The board id is taken from the socket path. After the upgrade the
//! channel registers with the session registry and enters a `select!` loop:
//! - Incoming client text → parse into a command → registry dispatch
//! - Snapshots queued by the board's fan-out → forward to the client
//!
//! Nothing is ever sent back in reply to a bad message. Unparseable input
//! is logged and dropped; the channel stays open.
//!
//! LIFECYCLE
//! =========
//! 1. Upgrade → register channel → `init` snapshot is queued
//! 2. Unknown board → close immediately
//! 3. Client sends commands → every mutation fans out a `state` snapshot
//! 4. Close → unregister (last channel out stops the clock)

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, State};
use axum::response::Response;
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::services::command;
use crate::services::session::{BoardId, ClientId};
use crate::state::AppState;

// =============================================================================
// UPGRADE
// =============================================================================

pub async fn handle_ws(State(state): State<AppState>, Path(id): Path<String>, ws: WebSocketUpgrade) -> Response {
    let board_id = BoardId::from(id);
    ws.on_upgrade(move |socket| run_ws(socket, state, board_id))
}

/// Socket opened without a board id: accepted, then closed straight away.
pub async fn handle_ws_without_board(ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(|mut socket| async move {
        warn!("ws: connection rejected, no board id");
        let _ = socket.send(Message::Close(None)).await;
    })
}

// =============================================================================
// CONNECTION
// =============================================================================

async fn run_ws(mut socket: WebSocket, state: AppState, board_id: BoardId) {
    let client_id = Uuid::new_v4();

    // Per-connection queue fed by the board's fan-out.
    let (client_tx, mut client_rx) = mpsc::channel::<String>(state.config.timing.client_queue);

    if let Err(e) = state.registry.register_channel(&board_id, client_id, client_tx).await {
        warn!(%board_id, error = %e, "ws: connection rejected");
        let _ = socket.send(Message::Close(None)).await;
        return;
    }
    info!(%board_id, %client_id, "ws: client connected");

    loop {
        tokio::select! {
            msg = socket.recv() => {
                let Some(msg) = msg else { break };
                let Ok(msg) = msg else { break };
                match msg {
                    Message::Text(text) => {
                        process_inbound_text(&state, &board_id, client_id, text.as_str()).await;
                    }
                    Message::Binary(bytes) => match std::str::from_utf8(&bytes) {
                        Ok(text) => process_inbound_text(&state, &board_id, client_id, text).await,
                        Err(e) => warn!(%board_id, %client_id, error = %e, "ws: non-utf8 binary message dropped"),
                    },
                    Message::Close(_) => break,
                    _ => {}
                }
            }
            Some(json) = client_rx.recv() => {
                if socket.send(Message::Text(json.into())).await.is_err() {
                    break;
                }
            }
        }
    }

    state.registry.unregister_channel(&board_id, client_id).await;
    info!(%board_id, %client_id, "ws: client disconnected");
}

// =============================================================================
// INBOUND
// =============================================================================

/// Parse one inbound message and dispatch it to the board.
///
/// Kept apart from the socket loop so tests can drive dispatch directly.
async fn process_inbound_text(state: &AppState, board_id: &BoardId, client_id: ClientId, text: &str) {
    match command::parse(text) {
        Ok(cmd) => {
            info!(%board_id, %client_id, command = cmd.name(), "ws: recv command");
            state.registry.dispatch(board_id, cmd).await;
        }
        Err(e) => {
            warn!(%board_id, %client_id, error = %e, "ws: inbound message dropped");
        }
    }
}

#[cfg(test)]
#[path = "ws_test.rs"]
mod tests;
