//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use wsso_auth::{
    CapabilityBackend, ClaimBuilder, ClaimsBackend, KeyRing, SessionBackend, SessionCodec,
    SessionManager, StaticSecretBackend, TokenService,
};
use wsso_core::config::AppConfig;
use wsso_core::result::AppResult;
use wsso_core::traits::Directory;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    /// Application configuration
    pub config: Arc<AppConfig>,

    // ── Collaborators ────────────────────────────────────────
    /// Identity directory
    pub directory: Arc<dyn Directory>,

    // ── Auth ─────────────────────────────────────────────────
    /// Signing keys, swappable at runtime
    pub keys: KeyRing,
    /// Token issuance and verification
    pub tokens: Arc<TokenService>,
    /// Claims assembly from directory lookups
    pub claims: Arc<ClaimBuilder>,
    /// Session lifecycle
    pub sessions: SessionManager,
    /// Session cookie signing
    pub session_codec: Arc<SessionCodec>,

    // ── Guards ───────────────────────────────────────────────
    /// Gate for routes requiring a session
    pub session_guard: Arc<dyn CapabilityBackend>,
    /// Gate for routes requiring admin claims
    pub admin_guard: Arc<dyn CapabilityBackend>,
    /// Gate for the directory administration surface
    pub directory_guard: Arc<dyn CapabilityBackend>,
}

impl AppState {
    /// Wires the state from already-built collaborators.
    pub fn new(config: AppConfig, directory: Arc<dyn Directory>, keys: KeyRing) -> Self {
        let tokens = Arc::new(TokenService::new(keys.clone(), &config.auth));
        let claims = Arc::new(ClaimBuilder::new(
            Arc::clone(&directory),
            config.auth.admin_group.clone(),
        ));
        let session_codec = Arc::new(SessionCodec::new(&config.session.secret));
        let directory_guard = Arc::new(StaticSecretBackend::new(&config.admin));

        Self {
            directory,
            keys,
            claims,
            sessions: SessionManager::new(),
            session_codec,
            session_guard: Arc::new(SessionBackend),
            admin_guard: Arc::new(ClaimsBackend::new(Arc::clone(&tokens))),
            directory_guard,
            tokens,
            config: Arc::new(config),
        }
    }

    /// Loads key material and builds the configured directory.
    pub async fn from_config(config: AppConfig) -> AppResult<Self> {
        let keys = KeyRing::load(&config.auth).await?;
        let directory = wsso_directory::build_directory(&config.directory)?;
        Ok(Self::new(config, directory, keys))
    }
}
