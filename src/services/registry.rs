//! Session registry — board lifecycle, channel membership, command dispatch.
//!
//! DESIGN
//! ======
//! The registry is the only owner of sessions. It is cheap to clone (one
//! `Arc`), so spawned clock and pulse tasks carry their own handle back to
//! it. The map lock is held only to find or insert a board; each session
//! then has its own mutex, held for one mutation plus its broadcast. That
//! mutex is the per-board mutual exclusion the single-writer clock relies
//! on, and boards never wait on each other.
//!
//! LIFECYCLE
//! =========
//! 1. `create_board` → fresh session with the default scoreboard
//! 2. `register_channel` → membership + `init` snapshot to that channel
//! 3. `dispatch` → mutate via the command processor, then `push`
//! 4. `unregister_channel` → membership removed; last one out stops the clock
//! 5. `shutdown` → all tasks cancelled, all sessions dropped

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};

use super::command::{self, Command};
use super::session::{BoardId, ClientId, ClientTx, Session};
use super::{clock, pulse};
use crate::config::Timing;
use crate::scoreboard::Scoreboard;

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("board not found: {0}")]
    NotFound(BoardId),
}

type SharedSession = Arc<Mutex<Session>>;

#[derive(Clone)]
pub struct SessionRegistry {
    sessions: Arc<RwLock<HashMap<BoardId, SharedSession>>>,
    timing: Timing,
}

impl SessionRegistry {
    #[must_use]
    pub fn new(timing: Timing) -> Self {
        Self { sessions: Arc::new(RwLock::new(HashMap::new())), timing }
    }

    #[must_use]
    pub fn timing(&self) -> Timing {
        self.timing
    }

    // =========================================================================
    // BOARDS
    // =========================================================================

    /// Create a board with the default scoreboard and return its id.
    /// Regenerates the id until it does not collide with a live board.
    pub async fn create_board(&self) -> BoardId {
        let mut sessions = self.sessions.write().await;
        let mut id = BoardId::generate();
        while sessions.contains_key(&id) {
            id = BoardId::generate();
        }
        sessions.insert(id.clone(), Arc::new(Mutex::new(Session::new())));
        info!(board_id = %id, boards = sessions.len(), "board created");
        id
    }

    pub async fn contains(&self, board_id: &BoardId) -> bool {
        self.sessions.read().await.contains_key(board_id)
    }

    /// Current snapshot of a board.
    pub async fn snapshot(&self, board_id: &BoardId) -> Result<Scoreboard, SessionError> {
        self.with_session(board_id, |s| s.scoreboard.clone())
            .await
            .ok_or_else(|| SessionError::NotFound(board_id.clone()))
    }

    pub async fn board_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Number of channels currently registered to a board (0 if unknown).
    #[cfg(test)]
    pub async fn client_count(&self, board_id: &BoardId) -> usize {
        self.with_session(board_id, |s| s.client_count()).await.unwrap_or(0)
    }

    /// Whether a clock task is currently scheduled for a board.
    #[cfg(test)]
    pub async fn has_active_clock(&self, board_id: &BoardId) -> bool {
        self.with_session(board_id, |s| s.has_active_clock()).await.unwrap_or(false)
    }

    /// Cancel every scheduled task and drop all sessions.
    pub async fn shutdown(&self) {
        let drained: Vec<SharedSession> = {
            let mut sessions = self.sessions.write().await;
            sessions.drain().map(|(_, session)| session).collect()
        };
        let count = drained.len();
        for session in drained {
            session.lock().await.cancel_tasks();
        }
        info!(boards = count, "session registry shut down");
    }

    // =========================================================================
    // CHANNELS
    // =========================================================================

    /// Add a channel to a board and send it the current snapshot as `init`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the board does not exist.
    pub async fn register_channel(
        &self,
        board_id: &BoardId,
        client_id: ClientId,
        tx: ClientTx,
    ) -> Result<(), SessionError> {
        self.with_session(board_id, |session| {
            session.send_init(&tx);
            session.clients.insert(client_id, tx);
            info!(%board_id, %client_id, clients = session.client_count(), "channel registered");
        })
        .await
        .ok_or_else(|| SessionError::NotFound(board_id.clone()))
    }

    /// Remove a channel. When the last one leaves, the clock is stopped but
    /// its elapsed values are kept.
    pub async fn unregister_channel(&self, board_id: &BoardId, client_id: ClientId) {
        self.with_session(board_id, |session| {
            session.clients.remove(&client_id);
            info!(%board_id, %client_id, remaining = session.client_count(), "channel unregistered");

            if session.client_count() == 0 && clock::is_running(session) {
                clock::stop(session);
                info!(%board_id, "no channels left; clock stopped");
            }
        })
        .await;
    }

    // =========================================================================
    // DISPATCH
    // =========================================================================

    /// Apply one operator command to a board, then broadcast the result.
    /// A vanished board is a silent no-op.
    pub async fn dispatch(&self, board_id: &BoardId, cmd: Command) {
        let applied = self
            .with_session(board_id, |session| {
                command::apply(self, board_id, session, cmd);
                session.push();
            })
            .await;
        if applied.is_none() {
            debug!(%board_id, "dispatch: board not found");
        }
    }

    /// Broadcast the current snapshot of a board to all its channels.
    #[cfg(test)]
    pub async fn push(&self, board_id: &BoardId) {
        self.with_session(board_id, |session| session.push()).await;
    }

    /// Run `f` against a board's session while holding that board's lock.
    /// The map lock is released before the session lock is taken.
    pub(crate) async fn with_session<R>(&self, board_id: &BoardId, f: impl FnOnce(&mut Session) -> R) -> Option<R> {
        let session = self.sessions.read().await.get(board_id).cloned()?;
        let mut guard = session.lock().await;
        Some(f(&mut guard))
    }
}

// =============================================================================
// SCHEDULED CALLBACKS
// =============================================================================

impl SessionRegistry {
    /// One clock tick for `board_id`, issued by the task started in `epoch`.
    /// Returns false when the task should exit.
    pub(crate) async fn clock_tick(&self, board_id: &BoardId, epoch: u64) -> bool {
        self.with_session(board_id, |session| {
            if !session.owns_clock(epoch) {
                return false;
            }
            let keep_running = clock::on_tick(board_id, session);
            session.push();
            keep_running
        })
        .await
        .unwrap_or(false)
    }

    /// Resolve the status pulse started in `epoch`.
    pub(crate) async fn pulse_elapsed(&self, board_id: &BoardId, epoch: u64, clear_hidden_message: bool) {
        self.with_session(board_id, |session| {
            if !session.owns_pulse(epoch) {
                return;
            }
            pulse::resolve(session, clear_hidden_message);
            session.push();
        })
        .await;
    }
}

#[cfg(test)]
#[path = "registry_test.rs"]
mod tests;
