//! Callback HTTP server.

use anyhow::{Context, Result};
use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;

use crate::config::Config;
use crate::gateway::callback::callback;
use crate::line::{LineClient, Platform};

/// Shared state for request handlers.
#[derive(Clone)]
pub struct ServerState {
    /// Platform client, built once at startup and only read afterwards.
    pub platform: Arc<dyn Platform>,
    /// Port reported by the health probe.
    pub port: u16,
}

/// Routes: `POST /callback` (LINE webhook) and `GET /` (health).
pub fn router(state: ServerState) -> Router {
    Router::new()
        .route("/", get(health_http))
        .route("/callback", post(callback))
        .with_state(state)
}

/// Build the LINE client from config, bind `server.bind:server.port`, and serve until SIGINT/SIGTERM.
/// Fails before binding when the channel secret or access token is missing.
/// The port is used as given; callers apply the PORT override with [`crate::config::resolve_port`].
pub async fn run_server(config: Config) -> Result<()> {
    let client = LineClient::from_config(&config)?;
    log::info!("line client ready (api base {})", client.api_base());
    let port = config.server.port;

    let state = ServerState {
        platform: Arc::new(client),
        port,
    };
    let app = router(state);

    let bind_addr = format!("{}:{}", config.server.bind, port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("binding to {}", bind_addr))?;
    log::info!("callback server listening on {}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("callback server exited")?;
    log::info!("callback server stopped");
    Ok(())
}

/// Future that completes when the process should shut down (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    log::info!("shutdown signal received, draining connections");
}

/// GET / returns a simple health JSON (for probes).
async fn health_http(State(state): State<ServerState>) -> Json<serde_json::Value> {
    Json(json!({
        "runtime": "running",
        "port": state.port,
    }))
}
