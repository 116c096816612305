//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section. The resulting [`AppConfig`] is built once at startup and passed
//! explicitly to every component that needs it.

pub mod admin;
pub mod app;
pub mod auth;
pub mod directory;
pub mod logging;
pub mod session;

use serde::{Deserialize, Serialize};

pub use self::admin::AdminConfig;
pub use self::app::{CorsConfig, ServerConfig};
pub use self::auth::{AuthConfig, SigningAlgorithm, TokenCookieConfig};
pub use self::directory::{DirectoryConfig, SeedIdentity};
pub use self::logging::LoggingConfig;
pub use self::session::SessionConfig;

use crate::error::AppError;
use crate::result::AppResult;

/// Prefix for environment variable overrides (`WSSO__AUTH__TOKEN_TTL_MINUTES`).
const ENV_PREFIX: &str = "WSSO";

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (default.toml + environment overlay).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Token signing and token cookie settings.
    pub auth: AuthConfig,
    /// Session cookie settings.
    pub session: SessionConfig,
    /// Shared-secret credential for the directory administration surface.
    pub admin: AdminConfig,
    /// Identity directory settings.
    #[serde(default)]
    pub directory: DirectoryConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges `config/default`, an environment-specific overlay
    /// (`config/{env}`), and environment variables prefixed with `WSSO__`.
    pub fn load(env: &str) -> AppResult<Self> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(Self::env_source())
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        Self::finish(config)
    }

    /// Load configuration from a single explicit file plus environment overrides.
    pub fn load_from(path: &str) -> AppResult<Self> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(path))
            .add_source(Self::env_source())
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        Self::finish(config)
    }

    /// Parse configuration from an in-memory TOML document.
    pub fn from_toml_str(document: &str) -> AppResult<Self> {
        let config = config::Config::builder()
            .add_source(config::File::from_str(document, config::FileFormat::Toml))
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        Self::finish(config)
    }

    fn env_source() -> config::Environment {
        config::Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true)
    }

    fn finish(config: config::Config) -> AppResult<Self> {
        let parsed: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;
        parsed.validate()?;
        Ok(parsed)
    }

    /// Rejects configurations that would weaken the trust boundaries.
    pub fn validate(&self) -> AppResult<()> {
        if self.session.secret.len() < session::MIN_SECRET_LEN {
            return Err(AppError::configuration(format!(
                "session.secret must be at least {} bytes",
                session::MIN_SECRET_LEN
            )));
        }
        if self.admin.password.is_empty() {
            return Err(AppError::configuration("admin.password must be set"));
        }
        if self.auth.token_ttl_minutes == 0 {
            return Err(AppError::configuration(
                "auth.token_ttl_minutes must be greater than zero",
            ));
        }
        if self.auth.admin_group.trim().is_empty() {
            return Err(AppError::configuration("auth.admin_group must be set"));
        }
        Ok(())
    }
}
