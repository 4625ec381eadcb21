//! Status-message animation pulse.
//!
//! Showing, hiding or re-revealing the status message raises
//! `isStatusMessageAnimating` for a short window. A newer pulse replaces the
//! pending one; the callback only runs if its epoch is still current.

use tracing::debug;

use super::registry::SessionRegistry;
use super::session::{BoardId, Scheduled, Session};

/// Raise the animating flag and schedule its reset. With
/// `clear_hidden_message`, the message text is also cleared when the pulse
/// ends, provided the message is still hidden by then.
pub fn start(registry: &SessionRegistry, board_id: &BoardId, session: &mut Session, clear_hidden_message: bool) {
    if let Some(previous) = session.pulse.take() {
        previous.cancel();
    }
    session.scoreboard.is_status_message_animating = true;

    let epoch = session.bump_epoch();
    let delay = registry.timing().pulse;
    let registry = registry.clone();
    let task_board = board_id.clone();
    let handle = tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        registry.pulse_elapsed(&task_board, epoch, clear_hidden_message).await;
    });

    session.pulse = Some(Scheduled { epoch, handle });
    debug!(%board_id, epoch, clear_hidden_message, "pulse: started");
}

/// End-of-pulse state change. Caller has already checked the epoch.
pub(crate) fn resolve(session: &mut Session, clear_hidden_message: bool) {
    session.pulse = None;
    let board = &mut session.scoreboard;
    board.is_status_message_animating = false;
    if clear_hidden_message && !board.is_status_message_visible {
        board.match_status_message.clear();
    }
}

/// Drop any pending pulse and lower the flag immediately.
pub fn cancel(session: &mut Session) {
    if let Some(pending) = session.pulse.take() {
        pending.cancel();
    }
    session.scoreboard.is_status_message_animating = false;
}

#[cfg(test)]
#[path = "pulse_test.rs"]
mod tests;
