//! Application builder: wires router, middleware and state into an Axum app
//! and runs it.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use ghostrepo_billing::StripeClient;
use ghostrepo_core::config::AppConfig;
use ghostrepo_core::error::AppError;
use ghostrepo_database::Stores;
use ghostrepo_github::GithubAppClient;

use crate::middleware::cors::build_cors_layer;
use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    let cors = build_cors_layer(&state.config.server.cors);
    let timeout = Duration::from_secs(state.config.server.request_timeout_seconds);

    build_router(state)
        .layer(TimeoutLayer::new(timeout))
        .layer(CompressionLayer::new())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Runs the GhostRepo server until a shutdown signal arrives.
pub async fn run_server(config: AppConfig) -> Result<(), AppError> {
    info!("Starting GhostRepo v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Storage backend + migrations ─────────────────────
    let stores = Stores::connect(&config.database).await?;

    // ── Step 2: Upstream clients ─────────────────────────────────
    let github = Arc::new(GithubAppClient::new(&config.github)?);
    let stripe = Arc::new(StripeClient::new(&config.payment)?);
    info!(api_url = %config.github.api_url, "GitHub App client ready");

    // ── Step 3: Services + router ────────────────────────────────
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let grace = Duration::from_secs(config.server.shutdown_grace_seconds);
    let state = AppState::new(config, stores.clone(), github, stripe);
    let app = build_app(state);

    // ── Step 4: Serve ────────────────────────────────────────────
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;
    info!(%addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(grace))
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    // ── Step 5: Cleanup ──────────────────────────────────────────
    stores.close().await;
    info!("GhostRepo stopped");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM. A second wait bounded by `grace` lets
/// in-flight requests finish before the process is forced down.
async fn shutdown_signal(grace: Duration) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!(grace_seconds = grace.as_secs(), "Shutdown signal received, draining connections");
    tokio::spawn(async move {
        tokio::time::sleep(grace).await;
        tracing::warn!("Grace period elapsed, forcing shutdown");
        std::process::exit(0);
    });
}
