//! `BrowserSession` extractor: restores the signed session and the cookie jar.

use std::convert::Infallible;
use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::cookie::CookieJar;
use tracing::debug;

use wsso_auth::CookieSession;
use wsso_auth::session::SessionStore;

use crate::state::AppState;

/// Cookies and session of the calling browser.
///
/// A missing or forged session cookie yields an empty session; the
/// extractor itself never rejects.
#[derive(Debug)]
pub struct BrowserSession {
    /// Incoming cookies; response cookies are added to it.
    pub jar: CookieJar,
    /// Session restored from the session cookie.
    pub session: CookieSession,
}

impl BrowserSession {
    /// Identity stored in the session, if any.
    pub fn identity(&self, state: &AppState) -> Option<&str> {
        state.sessions.identity(&self.session as &dyn SessionStore)
    }

    /// Value of the token cookie, if present.
    pub fn token(&self, state: &AppState) -> Option<&str> {
        self.jar
            .get(&state.config.auth.token_cookie.name)
            .map(|cookie| cookie.value())
            .filter(|value| !value.is_empty())
    }
}

impl FromRequestParts<AppState> for BrowserSession {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let raw = jar
            .get(&state.config.session.cookie_name)
            .map(|cookie| cookie.value().to_string());

        let session = CookieSession::load(Arc::clone(&state.session_codec), raw.as_deref());
        if raw.is_some() && session.is_empty() {
            debug!("Session cookie failed verification, treating as empty");
        }

        Ok(Self { jar, session })
    }
}
