//! Board creation and the two per-board pages.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use tracing::warn;

use crate::services::session::BoardId;
use crate::state::AppState;

const CONTROL_PAGE: &str = "control.html";
const DISPLAY_PAGE: &str = "scoreboard.html";

const NOT_FOUND_BODY: &str = "Error: no scoreboard with this id. Back to start: <a href='/'>Home</a>";

/// Create a board and send the operator to its control page.
pub async fn new_board(State(state): State<AppState>) -> Redirect {
    let board_id = state.registry.create_board().await;
    Redirect::to(&format!("/control/{board_id}"))
}

/// Operator page for an existing board.
pub async fn control_page(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    serve_board_page(&state, &BoardId::from(id), CONTROL_PAGE).await
}

/// Read-only display page for an existing board.
pub async fn board_page(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    serve_board_page(&state, &BoardId::from(id), DISPLAY_PAGE).await
}

async fn serve_board_page(state: &AppState, board_id: &BoardId, page: &str) -> Response {
    if !state.registry.contains(board_id).await {
        return (StatusCode::NOT_FOUND, Html(NOT_FOUND_BODY)).into_response();
    }

    let path = state.config.static_dir.join(page);
    match tokio::fs::read_to_string(&path).await {
        Ok(body) => Html(body).into_response(),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "pages: failed to read page");
            (StatusCode::INTERNAL_SERVER_ERROR, "page unavailable").into_response()
        }
    }
}

#[cfg(test)]
#[path = "pages_test.rs"]
mod tests;
