//! Route guards backed by [`CapabilityBackend`] implementations.
//!
//! Each guard gathers the credentials its backend needs, asks the backend,
//! and either stores the admitted [`Principal`] in request extensions or
//! aborts the request. Browser guards also expire the session and token
//! cookies when authentication fails; an authorization failure leaves the
//! session intact.

use axum::extract::{Request, State};
use axum::http::header::{AUTHORIZATION, WWW_AUTHENTICATE};
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tracing::{debug, warn};

use wsso_auth::{BasicCredentials, CapabilityBackend, GuardRequest, Principal};
use wsso_core::error::ErrorKind;

use crate::cookies::clear_all;
use crate::error::ApiError;
use crate::extractors::BrowserSession;
use crate::state::AppState;

/// Challenge sent with directory-administration rejections.
const BASIC_CHALLENGE: &str = "Basic realm=\"wsso\"";

/// Admits requests carrying an authenticated session.
pub async fn require_session(
    State(state): State<AppState>,
    browser: BrowserSession,
    request: Request,
    next: Next,
) -> Response {
    let backend = state.session_guard.clone();
    guard_browser(&state, backend.as_ref(), browser, request, next).await
}

/// Admits requests carrying a session and an admin claims token.
pub async fn require_admin(
    State(state): State<AppState>,
    browser: BrowserSession,
    request: Request,
    next: Next,
) -> Response {
    let backend = state.admin_guard.clone();
    guard_browser(&state, backend.as_ref(), browser, request, next).await
}

/// Admits requests presenting the directory-administration Basic credential.
pub async fn require_directory_admin(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let basic = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| BasicCredentials::from_header(value).ok());

    let guard_request = GuardRequest {
        basic,
        ..Default::default()
    };

    match state.directory_guard.authorize(&guard_request).await {
        Ok(principal) => {
            admit(&mut request, state.directory_guard.name(), principal);
            next.run(request).await
        }
        Err(rejection) => {
            warn!(
                guard = state.directory_guard.name(),
                path = %request.uri().path(),
                reason = %rejection,
                "Request rejected by guard"
            );
            let mut response = ApiError::from(rejection).into_response();
            response
                .headers_mut()
                .insert(WWW_AUTHENTICATE, HeaderValue::from_static(BASIC_CHALLENGE));
            response
        }
    }
}

async fn guard_browser(
    state: &AppState,
    backend: &dyn CapabilityBackend,
    browser: BrowserSession,
    mut request: Request,
    next: Next,
) -> Response {
    let guard_request = GuardRequest {
        session_identity: browser.identity(state).map(str::to_string),
        token: browser.token(state).map(str::to_string),
        basic: None,
    };

    match backend.authorize(&guard_request).await {
        Ok(principal) => {
            admit(&mut request, backend.name(), principal);
            next.run(request).await
        }
        Err(rejection) => {
            warn!(
                guard = backend.name(),
                path = %request.uri().path(),
                reason = %rejection,
                "Request rejected by guard"
            );
            if rejection.kind() == ErrorKind::Authentication {
                (clear_all(browser.jar, &state.config), ApiError::from(rejection)).into_response()
            } else {
                ApiError::from(rejection).into_response()
            }
        }
    }
}

fn admit(request: &mut Request, guard: &str, principal: Principal) {
    debug!(guard, username = principal.username(), "Request admitted");
    request.extensions_mut().insert(principal);
}
