//! Timer engine — the single ticking clock of a board.
//!
//! DESIGN
//! ======
//! A board is in one of three phases, derived from the scoreboard flags:
//! `Idle`, `RunningMatch`, `RunningExtra`. At most one ticking task exists
//! per board; `start_match` always stops the previous one first. The match
//! → extra rollover flips the phase inside the same task instead of
//! spawning a second one.
//!
//! `tick` is the pure state step. `on_tick` wraps it with task bookkeeping
//! and is called by the registry under the board's session lock.

use tokio::time::{Instant, MissedTickBehavior};
use tracing::debug;

use super::registry::SessionRegistry;
use super::session::{BoardId, Scheduled, Session};
use crate::scoreboard::Scoreboard;

// =============================================================================
// PHASE
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockPhase {
    Idle,
    RunningMatch,
    RunningExtra,
}

impl ClockPhase {
    #[must_use]
    pub fn of(board: &Scoreboard) -> Self {
        if board.is_timer_running {
            Self::RunningMatch
        } else if board.is_extra_time_running {
            Self::RunningExtra
        } else {
            Self::Idle
        }
    }
}

/// What a single tick did to the clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Clock advanced and keeps running in the same phase.
    Running,
    /// Match clock hit the half limit and extra time began.
    EnteredExtra,
    /// Clock reached its limit and is now idle.
    Finished,
    /// Nothing was running.
    Idle,
}

impl TickOutcome {
    #[must_use]
    pub fn keeps_running(self) -> bool {
        matches!(self, Self::Running | Self::EnteredExtra)
    }
}

// =============================================================================
// PURE STEP
// =============================================================================

/// Advance the running clock by one second.
pub fn tick(board: &mut Scoreboard) -> TickOutcome {
    match ClockPhase::of(board) {
        ClockPhase::Idle => TickOutcome::Idle,
        ClockPhase::RunningMatch => {
            board.timer += 1;
            if board.timer < board.half_limit_secs() {
                return TickOutcome::Running;
            }
            board.is_timer_running = false;
            let allowance = board.half_allowance();
            if allowance > 0 {
                begin_extra(board, allowance);
                TickOutcome::EnteredExtra
            } else {
                TickOutcome::Finished
            }
        }
        ClockPhase::RunningExtra => {
            board.extra_timer += 1;
            if board.extra_timer >= u64::from(board.extra) * 60 {
                // Elapsed extra time stays on display for the operator.
                board.is_extra_time_running = false;
                TickOutcome::Finished
            } else {
                TickOutcome::Running
            }
        }
    }
}

/// Enter extra time with `minutes` allotted, counting from zero.
pub fn begin_extra(board: &mut Scoreboard, minutes: u32) {
    board.is_timer_running = false;
    board.is_extra_time_running = true;
    board.extra_timer = 0;
    board.extra = minutes;
}

// =============================================================================
// TASK CONTROL
// =============================================================================

#[must_use]
pub fn is_running(session: &Session) -> bool {
    session.has_active_clock() || ClockPhase::of(&session.scoreboard) != ClockPhase::Idle
}

/// Stop whichever clock is running. Clears both running flags and cancels
/// the ticking task; elapsed values are untouched. Idempotent.
pub fn stop(session: &mut Session) {
    if let Some(clock) = session.clock.take() {
        clock.cancel();
    }
    session.scoreboard.is_timer_running = false;
    session.scoreboard.is_extra_time_running = false;
}

/// Start the match clock, replacing any clock already running.
pub fn start_match(registry: &SessionRegistry, board_id: &BoardId, session: &mut Session) {
    stop(session);
    session.scoreboard.is_timer_running = true;
    session.scoreboard.is_extra_time_running = false;
    spawn(registry, board_id, session);
}

/// Tick bookkeeping for the registry. Returns false once the clock is idle.
pub(crate) fn on_tick(board_id: &BoardId, session: &mut Session) -> bool {
    let outcome = tick(&mut session.scoreboard);
    match outcome {
        TickOutcome::EnteredExtra => {
            debug!(%board_id, extra = session.scoreboard.extra, "clock: entered extra time");
        }
        TickOutcome::Finished | TickOutcome::Idle => {
            // Detach rather than abort: this runs on the ticking task itself.
            session.clock = None;
            debug!(%board_id, ?outcome, "clock: stopped");
        }
        TickOutcome::Running => {}
    }
    outcome.keeps_running()
}

fn spawn(registry: &SessionRegistry, board_id: &BoardId, session: &mut Session) {
    let epoch = session.bump_epoch();
    let period = registry.timing().tick;
    let registry = registry.clone();
    let task_board = board_id.clone();

    let handle = tokio::spawn(async move {
        let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            if !registry.clock_tick(&task_board, epoch).await {
                break;
            }
        }
    });

    session.clock = Some(Scheduled { epoch, handle });
    debug!(%board_id, epoch, "clock: started");
}

#[cfg(test)]
#[path = "clock_test.rs"]
mod tests;
