//! Application builder: wires router, middleware, and state into an Axum app.

use axum::Router;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use wsso_core::config::AppConfig;
use wsso_core::error::AppError;
use wsso_core::result::AppResult;

use crate::middleware::cors::build_cors_layer;
use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    let cors = build_cors_layer(&state.config.server.cors);
    build_router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Runs the WSSO server with the given configuration.
pub async fn run_server(config: AppConfig) -> AppResult<()> {
    info!("Starting WSSO server...");

    // ── Step 1: Keys, directory, and shared state ────────────────
    let addr = config.server.bind_address();
    let state = AppState::from_config(config).await?;
    info!(
        algorithm = %state.config.auth.algorithm,
        kid = %state.keys.current_kid().await,
        "Signing keys loaded"
    );

    // ── Step 2: Key reload on SIGHUP ─────────────────────────────
    #[cfg(unix)]
    spawn_key_reload(&state);

    // ── Step 3: Build and start HTTP server ──────────────────────
    let app = build_app(state);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    info!("WSSO server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    info!("WSSO server stopped");
    Ok(())
}

/// Reloads signing keys from disk each time the process receives SIGHUP.
///
/// A failed reload keeps the current keys in service.
#[cfg(unix)]
fn spawn_key_reload(state: &AppState) {
    use tokio::signal::unix::{SignalKind, signal};

    let keys = state.keys.clone();
    let config = std::sync::Arc::clone(&state.config);

    tokio::spawn(async move {
        let mut hangup = match signal(SignalKind::hangup()) {
            Ok(stream) => stream,
            Err(e) => {
                error!(error = %e, "Failed to install SIGHUP handler, key reload disabled");
                return;
            }
        };

        while hangup.recv().await.is_some() {
            match keys.reload(&config.auth).await {
                Ok(kid) => info!(kid = %kid, "Signing keys reloaded"),
                Err(e) => error!(error = %e, "Signing key reload failed"),
            }
        }
    });
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
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

    info!("Shutdown signal received");
}
