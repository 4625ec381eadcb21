//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! Binds the board pages, the websocket endpoint and the static asset
//! directory under a single Axum router. Pages and assets are thin file
//! serving; all board behaviour sits behind the websocket.

pub mod pages;
pub mod ws;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Anything not routed below is a static asset (`index.html` at `/`).
    let assets = ServeDir::new(&state.config.static_dir).append_index_html_on_directories(true);

    Router::new()
        .route("/new", get(pages::new_board))
        .route("/board/{id}", get(pages::board_page))
        .route("/control/{id}", get(pages::control_page))
        .route("/ws", get(ws::handle_ws_without_board))
        .route("/ws/{id}", get(ws::handle_ws))
        .route("/healthz", get(healthz))
        .fallback_service(assets)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[derive(Debug, Serialize)]
struct Health {
    status: &'static str,
    boards: usize,
}

async fn healthz(State(state): State<AppState>) -> Json<Health> {
    Json(Health { status: "ok", boards: state.registry.board_count().await })
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
