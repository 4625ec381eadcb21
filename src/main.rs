mod config;
mod lenient;
mod routes;
mod scoreboard;
mod services;
mod state;

#[tokio::main]
async fn main() {
    // A missing .env file is fine; the environment may already be set.
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt::init();

    let config = config::Config::from_env();
    let port = config.port;
    tracing::info!(
        static_dir = %config.static_dir.display(),
        tick_ms = config.timing.tick.as_millis(),
        pulse_ms = config.timing.pulse.as_millis(),
        "configuration loaded"
    );

    let state = state::AppState::new(config);
    let registry = state.registry.clone();

    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, "scoreboard listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "failed to listen for ctrl-c; serving until killed");
                std::future::pending::<()>().await;
            }
            tracing::info!("shutting down");
        })
        .await
        .expect("server failed");

    registry.shutdown().await;
}
