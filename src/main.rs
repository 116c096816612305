//! WSSO Server: single sign-on gateway
//!
//! Main entry point: loads configuration, initializes logging, and starts
//! the HTTP server.

use tracing_subscriber::{EnvFilter, fmt};

use wsso_core::config::AppConfig;
use wsso_core::result::AppResult;

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);
    tracing::info!("Starting WSSO v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = wsso_api::run_server(config).await {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
}

/// Load configuration from an explicit file or the layered defaults
fn load_configuration() -> AppResult<AppConfig> {
    if let Ok(path) = std::env::var("WSSO_CONFIG") {
        return AppConfig::load_from(&path);
    }

    let env = std::env::var("WSSO_ENV").unwrap_or_else(|_| "development".to_string());
    AppConfig::load(&env)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}
