//! Scoreboard display state — the snapshot every viewer renders.
//!
//! DESIGN
//! ======
//! `Scoreboard` is plain data. Field names serialize in camelCase so the
//! snapshot shape is exactly what the control and display pages expect.
//! All behaviour (clocks, commands, fan-out) lives in `services`.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

// =============================================================================
// CONSTANTS
// =============================================================================

/// Match clock limit for the first half (45 minutes).
pub const FIRST_HALF_LIMIT_SECS: u64 = 45 * 60;

/// Match clock limit for the second half (90 minutes).
pub const SECOND_HALF_LIMIT_SECS: u64 = 90 * 60;

/// Status label shown by `showHalfTime`.
pub const HALF_TIME_LABEL: &str = "DEVRE ARASI";

/// Status label shown by `showFullTime`.
pub const FULL_TIME_LABEL: &str = "MAÇ SONU";

const DEFAULT_HOME_TEAM: &str = "Takım A";
const DEFAULT_AWAY_TEAM: &str = "Takım B";
const DEFAULT_HOME_COLOR: &str = "#0066ff";
const DEFAULT_AWAY_COLOR: &str = "#ff3333";
const DEFAULT_LOGO_BG_COLOR: &str = "#ffffff";
const DEFAULT_TIMER_BG_COLOR: &str = "#02271f";
const DEFAULT_TEAM_BG_COLOR: &str = "#033931";
const DEFAULT_EXTRA_TIME_BG_COLOR: &str = "#8B0000";
const DEFAULT_SCOREBOARD_BG_COLOR: &str = "#141414";
const DEFAULT_OPACITY: f64 = 1.0;

// =============================================================================
// SCOREBOARD
// =============================================================================

/// Full display state of one board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scoreboard {
    pub home_team: String,
    pub away_team: String,
    pub home_color: String,
    pub away_color: String,
    /// Opaque image payload, usually a data URI. Empty when unset.
    pub home_logo: String,
    pub away_logo: String,
    pub home_logo_bg_color: String,
    pub away_logo_bg_color: String,
    pub sponsor_logo: String,

    pub home_score: u32,
    pub away_score: u32,

    /// Elapsed match seconds.
    pub timer: u64,
    /// Current half, always 1 or 2.
    pub half: u8,
    pub is_timer_running: bool,

    /// Extra-time allowance for the first half, in minutes.
    pub extra1: u32,
    /// Extra-time allowance for the second half, in minutes.
    pub extra2: u32,
    /// Elapsed seconds into the running (or last run) extra period.
    pub extra_timer: u64,
    pub is_extra_time_running: bool,
    /// Minutes allotted to the current extra period.
    pub extra: u32,

    pub is_scoreboard_visible: bool,
    pub match_status_message: String,
    pub is_status_message_visible: bool,
    pub is_status_message_animating: bool,

    pub timer_bg_color: String,
    pub timer_opacity: f64,
    pub team_bg_color: String,
    pub team_opacity: f64,
    pub extra_time_bg_color: String,
    pub extra_time_opacity: f64,
    pub scoreboard_bg_color: String,
    pub scoreboard_opacity: f64,
}

impl Default for Scoreboard {
    fn default() -> Self {
        let styling = ZoneStyling::default();
        Self {
            home_team: DEFAULT_HOME_TEAM.into(),
            away_team: DEFAULT_AWAY_TEAM.into(),
            home_color: DEFAULT_HOME_COLOR.into(),
            away_color: DEFAULT_AWAY_COLOR.into(),
            home_logo: String::new(),
            away_logo: String::new(),
            home_logo_bg_color: DEFAULT_LOGO_BG_COLOR.into(),
            away_logo_bg_color: DEFAULT_LOGO_BG_COLOR.into(),
            sponsor_logo: String::new(),
            home_score: 0,
            away_score: 0,
            timer: 0,
            half: 1,
            is_timer_running: false,
            extra1: 0,
            extra2: 0,
            extra_timer: 0,
            is_extra_time_running: false,
            extra: 0,
            is_scoreboard_visible: true,
            match_status_message: String::new(),
            is_status_message_visible: false,
            is_status_message_animating: false,
            timer_bg_color: styling.timer_bg_color,
            timer_opacity: styling.timer_opacity,
            team_bg_color: styling.team_bg_color,
            team_opacity: styling.team_opacity,
            extra_time_bg_color: styling.extra_time_bg_color,
            extra_time_opacity: styling.extra_time_opacity,
            scoreboard_bg_color: styling.scoreboard_bg_color,
            scoreboard_opacity: styling.scoreboard_opacity,
        }
    }
}

impl Scoreboard {
    /// Match clock limit for the current half.
    #[must_use]
    pub fn half_limit_secs(&self) -> u64 {
        if self.half == 2 { SECOND_HALF_LIMIT_SECS } else { FIRST_HALF_LIMIT_SECS }
    }

    /// Extra-time allowance (minutes) configured for the current half.
    #[must_use]
    pub fn half_allowance(&self) -> u32 {
        if self.half == 2 { self.extra2 } else { self.extra1 }
    }

    /// Apply the eight zone color/opacity fields at once.
    pub fn set_styling(&mut self, styling: ZoneStyling) {
        self.timer_bg_color = styling.timer_bg_color;
        self.timer_opacity = clamp_opacity(styling.timer_opacity);
        self.team_bg_color = styling.team_bg_color;
        self.team_opacity = clamp_opacity(styling.team_opacity);
        self.extra_time_bg_color = styling.extra_time_bg_color;
        self.extra_time_opacity = clamp_opacity(styling.extra_time_opacity);
        self.scoreboard_bg_color = styling.scoreboard_bg_color;
        self.scoreboard_opacity = clamp_opacity(styling.scoreboard_opacity);
    }

    pub fn clear_logo(&mut self, team: Team) {
        match team {
            Team::Home => {
                self.home_logo.clear();
                self.home_logo_bg_color = DEFAULT_LOGO_BG_COLOR.into();
            }
            Team::Away => {
                self.away_logo.clear();
                self.away_logo_bg_color = DEFAULT_LOGO_BG_COLOR.into();
            }
        }
    }

    pub fn set_logo(&mut self, team: Team, logo: String) {
        match team {
            Team::Home => self.home_logo = logo,
            Team::Away => self.away_logo = logo,
        }
    }
}

// =============================================================================
// STYLING
// =============================================================================

/// The color/opacity pairs of the four styled zones, as sent by
/// `updateBackgroundColors`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneStyling {
    pub timer_bg_color: String,
    #[serde(deserialize_with = "crate::lenient::opacity")]
    pub timer_opacity: f64,
    pub team_bg_color: String,
    #[serde(deserialize_with = "crate::lenient::opacity")]
    pub team_opacity: f64,
    pub extra_time_bg_color: String,
    #[serde(deserialize_with = "crate::lenient::opacity")]
    pub extra_time_opacity: f64,
    pub scoreboard_bg_color: String,
    #[serde(deserialize_with = "crate::lenient::opacity")]
    pub scoreboard_opacity: f64,
}

impl Default for ZoneStyling {
    fn default() -> Self {
        Self {
            timer_bg_color: DEFAULT_TIMER_BG_COLOR.into(),
            timer_opacity: DEFAULT_OPACITY,
            team_bg_color: DEFAULT_TEAM_BG_COLOR.into(),
            team_opacity: DEFAULT_OPACITY,
            extra_time_bg_color: DEFAULT_EXTRA_TIME_BG_COLOR.into(),
            extra_time_opacity: DEFAULT_OPACITY,
            scoreboard_bg_color: DEFAULT_SCOREBOARD_BG_COLOR.into(),
            scoreboard_opacity: DEFAULT_OPACITY,
        }
    }
}

/// Clamp to [0, 1]. Non-finite input (NaN) resets to fully opaque.
#[must_use]
pub fn clamp_opacity(value: f64) -> f64 {
    if value.is_nan() { DEFAULT_OPACITY } else { value.clamp(0.0, 1.0) }
}

// =============================================================================
// TEAM
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Team {
    Home,
    Away,
}

impl Team {
    /// `"home"` selects the home side; anything else is treated as away.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        if label == "home" { Self::Home } else { Self::Away }
    }
}

// =============================================================================
// OUTBOUND MESSAGES
// =============================================================================

/// Intent of a server → client snapshot message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(test, derive(Deserialize))]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// Sent once to a freshly registered channel.
    Init,
    /// Sent to every channel after each mutation or tick.
    State,
}

/// `{action, state}` envelope. Borrows the snapshot when encoding.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(test, derive(Deserialize))]
pub struct ServerMessage<'a> {
    pub action: Action,
    pub state: Cow<'a, Scoreboard>,
}

impl ServerMessage<'_> {
    /// Serialize `{action, state}` into the JSON text sent over the wire.
    ///
    /// # Errors
    ///
    /// Returns a serialization error only if the snapshot contains a
    /// non-finite opacity, which `set_styling` never stores.
    pub fn encode(action: Action, state: &Scoreboard) -> Result<String, serde_json::Error> {
        serde_json::to_string(&ServerMessage { action, state: Cow::Borrowed(state) })
    }
}

#[cfg(test)]
#[path = "scoreboard_test.rs"]
mod tests;
