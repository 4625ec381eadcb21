//! Command processor — operator commands and their effect on one board.
//!
//! DESIGN
//! ======
//! Inbound text is parsed into a typed `Command` first; `apply` then mutates
//! a single session and may start/stop its clock or schedule a status pulse.
//! `apply` never broadcasts. The registry's `dispatch` always follows it
//! with a push, so every command reaches every viewer, including commands
//! that changed nothing.
//!
//! Numeric input is not range-checked by the protocol. Floats, numeric
//! strings and `null` decode through `lenient`; negative counts then clamp
//! to zero and opacities clamp to [0, 1]. Nothing is rejected for being out
//! of range.

use serde::Deserialize;
use tracing::debug;

use super::registry::SessionRegistry;
use super::session::{BoardId, Session};
use super::{clock, pulse};
use crate::lenient;
use crate::scoreboard::{FIRST_HALF_LIMIT_SECS, FULL_TIME_LABEL, HALF_TIME_LABEL, Scoreboard, Team, ZoneStyling};

// =============================================================================
// TYPES
// =============================================================================

/// Why an inbound message was dropped. Logged, never sent back.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    #[error("invalid json: {0}")]
    InvalidJson(serde_json::Error),
    #[error("message has no action")]
    MissingAction,
    #[error("malformed {action} command: {source}")]
    InvalidCommand { action: String, source: serde_json::Error },
}

/// One operator command, tagged by its `action` field.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Command {
    UpdateTeamNames { home_team_name: String, away_team_name: String },
    UpdateScores {
        #[serde(deserialize_with = "lenient::int")]
        home_score: i64,
        #[serde(deserialize_with = "lenient::int")]
        away_score: i64,
    },
    UpdateColors { home_color: String, away_color: String },
    UpdateBackgroundColors(ZoneStyling),
    ResetBackgroundColors,
    UploadLogo { team: String, logo: String },
    RemoveLogo { team: String },
    UploadSponsorLogo { logo: String },
    RemoveSponsorLogo,
    ToggleScoreboard,
    ToggleTimer,
    ResetTimer,
    SetManualTimer {
        #[serde(deserialize_with = "lenient::int")]
        minutes: i64,
        #[serde(deserialize_with = "lenient::int")]
        seconds: i64,
    },
    SetExtraTimes {
        #[serde(deserialize_with = "lenient::int")]
        extra1: i64,
        #[serde(deserialize_with = "lenient::int")]
        extra2: i64,
    },
    ResetExtraTime,
    StartFirstHalf,
    StartSecondHalf,
    ShowHalfTime,
    ShowFullTime,
    HideStatusMessage,
    ResetAll,
    /// Any action name not listed above.
    #[serde(other)]
    Unknown,
}

impl Command {
    /// Wire name of the action, for logging.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::UpdateTeamNames { .. } => "updateTeamNames",
            Self::UpdateScores { .. } => "updateScores",
            Self::UpdateColors { .. } => "updateColors",
            Self::UpdateBackgroundColors(_) => "updateBackgroundColors",
            Self::ResetBackgroundColors => "resetBackgroundColors",
            Self::UploadLogo { .. } => "uploadLogo",
            Self::RemoveLogo { .. } => "removeLogo",
            Self::UploadSponsorLogo { .. } => "uploadSponsorLogo",
            Self::RemoveSponsorLogo => "removeSponsorLogo",
            Self::ToggleScoreboard => "toggleScoreboard",
            Self::ToggleTimer => "toggleTimer",
            Self::ResetTimer => "resetTimer",
            Self::SetManualTimer { .. } => "setManualTimer",
            Self::SetExtraTimes { .. } => "setExtraTimes",
            Self::ResetExtraTime => "resetExtraTime",
            Self::StartFirstHalf => "startFirstHalf",
            Self::StartSecondHalf => "startSecondHalf",
            Self::ShowHalfTime => "showHalfTime",
            Self::ShowFullTime => "showFullTime",
            Self::HideStatusMessage => "hideStatusMessage",
            Self::ResetAll => "resetAll",
            Self::Unknown => "unknown",
        }
    }
}

// =============================================================================
// PARSE
// =============================================================================

/// Parse one inbound text message.
///
/// # Errors
///
/// Returns `InvalidJson` for unparseable text, `MissingAction` when there is
/// no non-empty string `action`, and `InvalidCommand` when a known action
/// carries missing or mistyped fields. Unknown actions parse as
/// `Command::Unknown`.
pub fn parse(text: &str) -> Result<Command, ProtocolError> {
    let value: serde_json::Value = serde_json::from_str(text).map_err(ProtocolError::InvalidJson)?;
    let action = value
        .get("action")
        .and_then(serde_json::Value::as_str)
        .filter(|a| !a.is_empty())
        .map(str::to_owned)
        .ok_or(ProtocolError::MissingAction)?;
    serde_json::from_value(value).map_err(|source| ProtocolError::InvalidCommand { action, source })
}

// =============================================================================
// APPLY
// =============================================================================

/// Apply `cmd` to `session`. Fields a command does not name are unchanged.
pub fn apply(registry: &SessionRegistry, board_id: &BoardId, session: &mut Session, cmd: Command) {
    match cmd {
        Command::UpdateTeamNames { home_team_name, away_team_name } => {
            session.scoreboard.home_team = home_team_name;
            session.scoreboard.away_team = away_team_name;
        }
        Command::UpdateScores { home_score, away_score } => {
            session.scoreboard.home_score = non_negative(home_score);
            session.scoreboard.away_score = non_negative(away_score);
        }
        Command::UpdateColors { home_color, away_color } => {
            session.scoreboard.home_color = home_color;
            session.scoreboard.away_color = away_color;
        }
        Command::UpdateBackgroundColors(styling) => session.scoreboard.set_styling(styling),
        Command::ResetBackgroundColors => session.scoreboard.set_styling(ZoneStyling::default()),
        Command::UploadLogo { team, logo } => session.scoreboard.set_logo(Team::from_label(&team), logo),
        Command::RemoveLogo { team } => session.scoreboard.clear_logo(Team::from_label(&team)),
        Command::UploadSponsorLogo { logo } => session.scoreboard.sponsor_logo = logo,
        Command::RemoveSponsorLogo => session.scoreboard.sponsor_logo.clear(),
        Command::ToggleScoreboard => {
            session.scoreboard.is_scoreboard_visible = !session.scoreboard.is_scoreboard_visible;
            if session.scoreboard.is_status_message_visible {
                pulse::start(registry, board_id, session, false);
            }
        }
        Command::ToggleTimer => {
            if clock::is_running(session) {
                clock::stop(session);
            } else {
                clock::start_match(registry, board_id, session);
            }
        }
        Command::ResetTimer => {
            clock::stop(session);
            session.scoreboard.timer = 0;
        }
        Command::SetManualTimer { minutes, seconds } => {
            clock::stop(session);
            let total = minutes.saturating_mul(60).saturating_add(seconds);
            session.scoreboard.timer = u64::try_from(total).unwrap_or(0);
        }
        Command::SetExtraTimes { extra1, extra2 } => {
            session.scoreboard.extra1 = non_negative(extra1);
            session.scoreboard.extra2 = non_negative(extra2);
        }
        Command::ResetExtraTime => {
            clock::stop(session);
            let board = &mut session.scoreboard;
            board.is_extra_time_running = false;
            board.extra_timer = 0;
            board.extra = 0;
        }
        Command::StartFirstHalf => {
            clock::stop(session);
            session.scoreboard.half = 1;
            session.scoreboard.timer = 0;
        }
        Command::StartSecondHalf => {
            clock::stop(session);
            session.scoreboard.half = 2;
            session.scoreboard.timer = FIRST_HALF_LIMIT_SECS;
        }
        Command::ShowHalfTime => show_status(registry, board_id, session, HALF_TIME_LABEL),
        Command::ShowFullTime => show_status(registry, board_id, session, FULL_TIME_LABEL),
        Command::HideStatusMessage => {
            session.scoreboard.is_status_message_visible = false;
            pulse::start(registry, board_id, session, true);
        }
        Command::ResetAll => {
            clock::stop(session);
            pulse::cancel(session);
            session.scoreboard = Scoreboard::default();
        }
        Command::Unknown => {
            debug!(%board_id, "command: unknown action ignored");
        }
    }
}

fn show_status(registry: &SessionRegistry, board_id: &BoardId, session: &mut Session, label: &str) {
    clock::stop(session);
    session.scoreboard.match_status_message = label.to_owned();
    session.scoreboard.is_status_message_visible = true;
    pulse::start(registry, board_id, session, false);
}

/// Clamp a signed protocol number into an unsigned field.
fn non_negative(value: i64) -> u32 {
    u32::try_from(value.max(0)).unwrap_or(u32::MAX)
}

#[cfg(test)]
#[path = "command_test.rs"]
mod tests;
