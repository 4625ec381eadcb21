//! Per-board session: display state, connected channels, scheduled tasks.
//!
//! DESIGN
//! ======
//! A `Session` is only ever touched while its own mutex in the registry is
//! held, so a command, a clock tick and a pulse callback for the same board
//! never interleave mid-mutation. Scheduled work (clock ticks, status pulses) is a
//! spawned task whose handle lives here alongside an epoch number; callbacks
//! compare their epoch before mutating so a superseded task is inert even if
//! it wins a race with `abort()`.

use std::collections::HashMap;
use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::warn;
use uuid::Uuid;

use crate::scoreboard::{Action, Scoreboard, ServerMessage};

/// Characters used for board ids.
const BOARD_ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Length of generated board ids.
pub const BOARD_ID_LEN: usize = 8;

// =============================================================================
// IDS
// =============================================================================

/// Short public identifier of a board, used in page URLs and socket paths.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BoardId(String);

impl BoardId {
    /// Generate a random 8-character lowercase alphanumeric id.
    #[must_use]
    pub fn generate() -> Self {
        let mut rng = rand::rng();
        let id = (0..BOARD_ID_LEN)
            .map(|_| char::from(BOARD_ID_ALPHABET[rng.random_range(0..BOARD_ID_ALPHABET.len())]))
            .collect();
        Self(id)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for BoardId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for BoardId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for BoardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifies one connected channel within a board.
pub type ClientId = Uuid;

/// Outbound queue of serialized server messages for one channel.
pub type ClientTx = mpsc::Sender<String>;

// =============================================================================
// SCHEDULED TASKS
// =============================================================================

/// A spawned task owned by a session, tagged with the epoch it was started in.
#[derive(Debug)]
pub(crate) struct Scheduled {
    pub(crate) epoch: u64,
    pub(crate) handle: JoinHandle<()>,
}

impl Scheduled {
    pub(crate) fn cancel(self) {
        self.handle.abort();
    }
}

// =============================================================================
// SESSION
// =============================================================================

pub struct Session {
    pub scoreboard: Scoreboard,
    pub(crate) clients: HashMap<ClientId, ClientTx>,
    pub(crate) clock: Option<Scheduled>,
    pub(crate) pulse: Option<Scheduled>,
    next_epoch: u64,
}

impl Session {
    #[must_use]
    pub fn new() -> Self {
        Self { scoreboard: Scoreboard::default(), clients: HashMap::new(), clock: None, pulse: None, next_epoch: 0 }
    }

    /// Hand out a fresh epoch for a newly scheduled task.
    pub(crate) fn bump_epoch(&mut self) -> u64 {
        self.next_epoch += 1;
        self.next_epoch
    }

    /// True while the clock task started in `epoch` is still the current one.
    #[must_use]
    pub(crate) fn owns_clock(&self, epoch: u64) -> bool {
        self.clock.as_ref().is_some_and(|c| c.epoch == epoch)
    }

    #[must_use]
    pub(crate) fn owns_pulse(&self, epoch: u64) -> bool {
        self.pulse.as_ref().is_some_and(|p| p.epoch == epoch)
    }

    #[must_use]
    pub fn has_active_clock(&self) -> bool {
        self.clock.is_some()
    }

    #[must_use]
    pub fn client_count(&self) -> usize {
        self.clients.len()
    }

    /// Cancel every scheduled task. Display state is left untouched.
    pub(crate) fn cancel_tasks(&mut self) {
        if let Some(clock) = self.clock.take() {
            clock.cancel();
        }
        if let Some(pulse) = self.pulse.take() {
            pulse.cancel();
        }
    }

    /// Send the current snapshot to one channel as an `init` message.
    pub(crate) fn send_init(&self, tx: &ClientTx) {
        match ServerMessage::encode(Action::Init, &self.scoreboard) {
            Ok(json) => {
                let _ = tx.try_send(json);
            }
            Err(e) => warn!(error = %e, "session: failed to encode init snapshot"),
        }
    }

    /// Broadcast the current snapshot to every channel as a `state` message.
    ///
    /// Serializes once; full or closed queues are skipped. Channel removal is
    /// left to the connection's own close path.
    pub fn push(&self) {
        if self.clients.is_empty() {
            return;
        }
        let json = match ServerMessage::encode(Action::State, &self.scoreboard) {
            Ok(j) => j,
            Err(e) => {
                warn!(error = %e, "session: failed to encode state snapshot");
                return;
            }
        };
        for tx in self.clients.values() {
            // Best-effort: if a client's queue is full or closed, skip it.
            let _ = tx.try_send(json.clone());
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.cancel_tasks();
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
