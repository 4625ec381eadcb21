use super::*;
use serde_json::json;

#[test]
fn default_snapshot_matches_wire_record() {
    let value = serde_json::to_value(Scoreboard::default()).unwrap();
    assert_eq!(
        value,
        json!({
            "homeTeam": "Takım A",
            "awayTeam": "Takım B",
            "homeColor": "#0066ff",
            "awayColor": "#ff3333",
            "homeLogo": "",
            "awayLogo": "",
            "homeLogoBgColor": "#ffffff",
            "awayLogoBgColor": "#ffffff",
            "sponsorLogo": "",
            "homeScore": 0,
            "awayScore": 0,
            "timer": 0,
            "half": 1,
            "isTimerRunning": false,
            "extra1": 0,
            "extra2": 0,
            "extraTimer": 0,
            "isExtraTimeRunning": false,
            "extra": 0,
            "isScoreboardVisible": true,
            "matchStatusMessage": "",
            "isStatusMessageVisible": false,
            "isStatusMessageAnimating": false,
            "timerBgColor": "#02271f",
            "timerOpacity": 1.0,
            "teamBgColor": "#033931",
            "teamOpacity": 1.0,
            "extraTimeBgColor": "#8B0000",
            "extraTimeOpacity": 1.0,
            "scoreboardBgColor": "#141414",
            "scoreboardOpacity": 1.0
        })
    );
}

#[test]
fn half_limits_follow_current_half() {
    let mut board = Scoreboard::default();
    assert_eq!(board.half_limit_secs(), 2700);
    board.half = 2;
    assert_eq!(board.half_limit_secs(), 5400);
}

#[test]
fn half_allowance_picks_matching_extra() {
    let mut board = Scoreboard { extra1: 3, extra2: 7, ..Scoreboard::default() };
    assert_eq!(board.half_allowance(), 3);
    board.half = 2;
    assert_eq!(board.half_allowance(), 7);
}

#[test]
fn set_styling_clamps_opacities() {
    let mut board = Scoreboard::default();
    board.set_styling(ZoneStyling {
        timer_bg_color: "#000000".into(),
        timer_opacity: 1.7,
        team_bg_color: "#111111".into(),
        team_opacity: -0.2,
        extra_time_bg_color: "#222222".into(),
        extra_time_opacity: 0.4,
        scoreboard_bg_color: "#333333".into(),
        scoreboard_opacity: f64::NAN,
    });
    assert_eq!(board.timer_bg_color, "#000000");
    assert!((board.timer_opacity - 1.0).abs() < f64::EPSILON);
    assert!(board.team_opacity.abs() < f64::EPSILON);
    assert!((board.extra_time_opacity - 0.4).abs() < f64::EPSILON);
    assert!((board.scoreboard_opacity - 1.0).abs() < f64::EPSILON);
    assert_eq!(board.scoreboard_bg_color, "#333333");
}

#[test]
fn clear_logo_resets_background_color() {
    let mut board = Scoreboard::default();
    board.set_logo(Team::Home, "data:image/png;base64,AAAA".into());
    board.home_logo_bg_color = "#123456".into();
    board.set_logo(Team::Away, "data:image/png;base64,BBBB".into());

    board.clear_logo(Team::Home);

    assert_eq!(board.home_logo, "");
    assert_eq!(board.home_logo_bg_color, "#ffffff");
    assert_eq!(board.away_logo, "data:image/png;base64,BBBB");
}

#[test]
fn team_label_defaults_to_away() {
    assert_eq!(Team::from_label("home"), Team::Home);
    assert_eq!(Team::from_label("away"), Team::Away);
    assert_eq!(Team::from_label("HOME"), Team::Away);
    assert_eq!(Team::from_label(""), Team::Away);
}

#[test]
fn encode_wraps_snapshot_with_action() {
    let board = Scoreboard { home_score: 2, ..Scoreboard::default() };
    let init: serde_json::Value = serde_json::from_str(&ServerMessage::encode(Action::Init, &board).unwrap()).unwrap();
    let state: serde_json::Value = serde_json::from_str(&ServerMessage::encode(Action::State, &board).unwrap()).unwrap();

    assert_eq!(init["action"], "init");
    assert_eq!(state["action"], "state");
    assert_eq!(init["state"], state["state"]);
    assert_eq!(state["state"]["homeScore"], 2);
}

#[test]
fn encoded_message_decodes_as_server_message() {
    let text = ServerMessage::encode(Action::State, &Scoreboard::default()).unwrap();
    let msg: ServerMessage = serde_json::from_str(&text).unwrap();
    assert_eq!(msg.action, Action::State);
    assert_eq!(*msg.state, Scoreboard::default());
}
