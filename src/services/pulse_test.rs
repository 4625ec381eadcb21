use super::*;
use crate::scoreboard::{FULL_TIME_LABEL, HALF_TIME_LABEL};
use crate::services::command::Command;
use crate::state::test_helpers;
use tokio::time::{Duration, sleep};

#[tokio::test(start_paused = true)]
async fn show_half_time_pulses_then_settles() {
    let state = test_helpers::test_app_state();
    let registry = &state.registry;
    let board_id = test_helpers::seed_board(&state).await;

    registry.dispatch(&board_id, Command::ShowHalfTime).await;
    let board = registry.snapshot(&board_id).await.unwrap();
    assert_eq!(board.match_status_message, HALF_TIME_LABEL);
    assert!(board.is_status_message_visible);
    assert!(board.is_status_message_animating);

    sleep(Duration::from_millis(600)).await;
    let board = registry.snapshot(&board_id).await.unwrap();
    assert!(!board.is_status_message_animating);
    assert!(board.is_status_message_visible);
    assert_eq!(board.match_status_message, HALF_TIME_LABEL);
}

#[tokio::test(start_paused = true)]
async fn hide_clears_message_after_pulse() {
    let state = test_helpers::test_app_state();
    let registry = &state.registry;
    let board_id = test_helpers::seed_board(&state).await;

    registry.dispatch(&board_id, Command::ShowFullTime).await;
    sleep(Duration::from_millis(600)).await;
    registry.dispatch(&board_id, Command::HideStatusMessage).await;

    let board = registry.snapshot(&board_id).await.unwrap();
    assert!(!board.is_status_message_visible);
    assert!(board.is_status_message_animating);
    assert_eq!(board.match_status_message, FULL_TIME_LABEL);

    sleep(Duration::from_millis(600)).await;
    let board = registry.snapshot(&board_id).await.unwrap();
    assert!(!board.is_status_message_animating);
    assert_eq!(board.match_status_message, "");
}

#[tokio::test(start_paused = true)]
async fn show_during_hide_pulse_keeps_new_message() {
    let state = test_helpers::test_app_state();
    let registry = &state.registry;
    let board_id = test_helpers::seed_board(&state).await;

    registry.dispatch(&board_id, Command::ShowHalfTime).await;
    registry.dispatch(&board_id, Command::HideStatusMessage).await;
    sleep(Duration::from_millis(200)).await;
    registry.dispatch(&board_id, Command::ShowFullTime).await;

    sleep(Duration::from_millis(400)).await;
    // The superseded hide pulse would have fired by now.
    let board = registry.snapshot(&board_id).await.unwrap();
    assert_eq!(board.match_status_message, FULL_TIME_LABEL);
    assert!(board.is_status_message_visible);
    assert!(board.is_status_message_animating);

    sleep(Duration::from_millis(200)).await;
    let board = registry.snapshot(&board_id).await.unwrap();
    assert!(!board.is_status_message_animating);
    assert_eq!(board.match_status_message, FULL_TIME_LABEL);
}

#[tokio::test(start_paused = true)]
async fn toggle_scoreboard_pulses_only_with_visible_status() {
    let state = test_helpers::test_app_state();
    let registry = &state.registry;
    let board_id = test_helpers::seed_board(&state).await;

    registry.dispatch(&board_id, Command::ToggleScoreboard).await;
    let board = registry.snapshot(&board_id).await.unwrap();
    assert!(!board.is_scoreboard_visible);
    assert!(!board.is_status_message_animating);

    registry.dispatch(&board_id, Command::ShowHalfTime).await;
    sleep(Duration::from_millis(600)).await;
    registry.dispatch(&board_id, Command::ToggleScoreboard).await;
    let board = registry.snapshot(&board_id).await.unwrap();
    assert!(board.is_scoreboard_visible);
    assert!(board.is_status_message_animating);

    sleep(Duration::from_millis(600)).await;
    let board = registry.snapshot(&board_id).await.unwrap();
    assert!(!board.is_status_message_animating);
    assert_eq!(board.match_status_message, HALF_TIME_LABEL);
}

#[tokio::test(start_paused = true)]
async fn pulse_end_is_broadcast() {
    let state = test_helpers::test_app_state();
    let board_id = test_helpers::seed_board(&state).await;
    let (_client, mut rx) = test_helpers::connect(&state, &board_id).await;
    test_helpers::recv_json(&mut rx).await;

    state.registry.dispatch(&board_id, Command::ShowHalfTime).await;
    let shown = test_helpers::recv_json(&mut rx).await;
    assert_eq!(shown["state"]["isStatusMessageAnimating"], true);

    let settled = test_helpers::recv_json(&mut rx).await;
    assert_eq!(settled["action"], "state");
    assert_eq!(settled["state"]["isStatusMessageAnimating"], false);
    assert_eq!(settled["state"]["isStatusMessageVisible"], true);
}

#[tokio::test(start_paused = true)]
async fn reset_all_cancels_pending_pulse() {
    let state = test_helpers::test_app_state();
    let registry = &state.registry;
    let board_id = test_helpers::seed_board(&state).await;
    let (_client, mut rx) = test_helpers::connect(&state, &board_id).await;
    test_helpers::recv_json(&mut rx).await;

    registry.dispatch(&board_id, Command::ShowHalfTime).await;
    registry.dispatch(&board_id, Command::ResetAll).await;
    test_helpers::drain_last(&mut rx);

    sleep(Duration::from_millis(600)).await;
    test_helpers::assert_no_message(&mut rx).await;
    assert_eq!(registry.snapshot(&board_id).await.unwrap(), crate::scoreboard::Scoreboard::default());
}

#[tokio::test(start_paused = true)]
async fn stale_pulse_callback_is_ignored() {
    let state = test_helpers::test_app_state();
    let registry = &state.registry;
    let board_id = test_helpers::seed_board(&state).await;

    registry.dispatch(&board_id, Command::ShowHalfTime).await;
    registry.pulse_elapsed(&board_id, u64::MAX, true).await;

    let board = registry.snapshot(&board_id).await.unwrap();
    assert!(board.is_status_message_animating);
}

#[test]
fn resolve_clears_only_hidden_message() {
    let mut session = Session::new();
    session.scoreboard.match_status_message = HALF_TIME_LABEL.into();
    session.scoreboard.is_status_message_visible = true;
    session.scoreboard.is_status_message_animating = true;

    resolve(&mut session, true);
    assert!(!session.scoreboard.is_status_message_animating);
    assert_eq!(session.scoreboard.match_status_message, HALF_TIME_LABEL);

    session.scoreboard.is_status_message_visible = false;
    resolve(&mut session, true);
    assert_eq!(session.scoreboard.match_status_message, "");
}
