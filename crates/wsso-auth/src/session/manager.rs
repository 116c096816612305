//! Session lifecycle: marking an identity as logged in and ending it.

use serde::Serialize;
use tracing::{error, info};

use wsso_core::error::{AppError, ErrorKind};
use wsso_core::result::AppResult;

use super::store::SessionStore;

/// Session key holding the authenticated identity.
pub const IDENTITY_KEY: &str = "id";

/// Result of a logout request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LogoutOutcome {
    /// An active session was ended.
    Ended,
    /// There was no session to end.
    NoSession,
}

/// Applies login and logout to a session store.
///
/// Holds no state of its own; the session lives in the store.
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionManager;

impl SessionManager {
    /// Creates a session manager.
    pub fn new() -> Self {
        Self
    }

    /// Marks the session as belonging to `identity`.
    ///
    /// The change is buffered; call [`SessionManager::persist`] to save it.
    pub fn login(&self, store: &mut dyn SessionStore, identity: &str) -> AppResult<()> {
        if identity.trim().is_empty() {
            return Err(AppError::validation("Session identity must not be empty"));
        }
        store.set(IDENTITY_KEY, identity.to_string());
        Ok(())
    }

    /// Identity the session belongs to, if any.
    pub fn identity<'a>(&self, store: &'a dyn SessionStore) -> Option<&'a str> {
        store.get(IDENTITY_KEY).filter(|id| !id.is_empty())
    }

    /// Whether the session carries an identity.
    pub fn is_authenticated(&self, store: &dyn SessionStore) -> bool {
        self.identity(store).is_some()
    }

    /// Removes the identity and saves the session.
    pub fn logout(&self, store: &mut dyn SessionStore) -> AppResult<LogoutOutcome> {
        let Some(identity) = self.identity(store).map(str::to_string) else {
            return Ok(LogoutOutcome::NoSession);
        };
        store.delete(IDENTITY_KEY);
        self.persist(store)?;
        info!(username = %identity, "Session ended");
        Ok(LogoutOutcome::Ended)
    }

    /// Saves buffered session changes.
    pub fn persist(&self, store: &mut dyn SessionStore) -> AppResult<()> {
        store.save().map_err(|e| {
            error!(error = %e, "Failed to save session");
            AppError::with_source(ErrorKind::Session, "Failed to save session", e)
        })
    }
}
