//! Auth handlers: login, logout, register, and token links.

use axum::extract::{Path, State};
use axum::{Extension, Json};
use axum_extra::extract::cookie::CookieJar;
use tracing::{debug, info, warn};

use wsso_auth::{CookieSession, LogoutOutcome, MarkerPurpose, Principal};
use wsso_core::error::{AppError, ErrorKind};
use wsso_core::traits::{DirectoryError, NewIdentity};

use crate::cookies::{apply_session_write, clear_all, token_cookie};
use crate::dto::request::{LoginRequest, RegisterRequest, ValidatedJson};
use crate::dto::response::{LinkResponse, MessageResponse};
use crate::error::ApiError;
use crate::extractors::BrowserSession;
use crate::state::AppState;

/// Response carrying cookie changes alongside the body.
type WithCookies<T> = Result<(CookieJar, Json<T>), (CookieJar, ApiError)>;

/// POST /login
///
/// Verifies the credential, marks the session, and sets the claims token
/// cookie. Any failure after body validation expires both cookies.
pub async fn login(
    State(state): State<AppState>,
    BrowserSession { jar, mut session }: BrowserSession,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> WithCookies<MessageResponse> {
    match establish(&state, &mut session, &req).await {
        Ok(token) => {
            let jar = apply_session_write(jar, session.take_write(), &state.config.session)
                .add(token_cookie(token, &state.config.auth.token_cookie));
            info!(username = %req.username, "Login succeeded");
            Ok((jar, Json(MessageResponse::new("Successfully logged in!"))))
        }
        Err(err) => Err((clear_all(jar, &state.config), err)),
    }
}

/// Directory bind, then claims, then token, then session save.
async fn establish(
    state: &AppState,
    session: &mut CookieSession,
    req: &LoginRequest,
) -> Result<String, ApiError> {
    state
        .directory
        .bind(&req.username, &req.password)
        .await
        .map_err(|err| match err {
            DirectoryError::InvalidCredentials | DirectoryError::NotFound(_) => {
                warn!(username = %req.username, "Login rejected");
                ApiError(AppError::authentication("Incorrect username or password."))
            }
            other => {
                warn!(
                    username = %req.username,
                    error = %other,
                    detail = other.detail().unwrap_or_default(),
                    "Directory bind failed"
                );
                ApiError::from(other)
            }
        })?;

    state.sessions.login(session, &req.username)?;

    let claims = state.claims.build(&req.username).await?;
    let token = state
        .tokens
        .issue_claims(&claims)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Internal, "Failed to generate JWT", e))?;

    state.sessions.persist(session)?;
    Ok(token)
}

/// POST /logout
///
/// Always expires both cookies, with or without an active session.
pub async fn logout(
    State(state): State<AppState>,
    BrowserSession { jar, mut session }: BrowserSession,
) -> WithCookies<MessageResponse> {
    let jar = clear_all(jar, &state.config);
    match state.sessions.logout(&mut session) {
        Ok(outcome) => {
            debug!(?outcome, "Logout handled");
            let message = match outcome {
                LogoutOutcome::Ended => "Successfully logged out!",
                LogoutOutcome::NoSession => "No session.",
            };
            Ok((jar, Json(MessageResponse::new(message))))
        }
        Err(err) => Err((jar, err.into())),
    }
}

/// POST /register
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let username = req.username.clone();
    let identity = NewIdentity {
        username: req.username,
        password: req.password,
        email: req.email,
    };

    state.directory.register(identity).await.map_err(|err| {
        warn!(username = %username, error = %err, "Registration failed");
        ApiError(AppError::with_source(
            ErrorKind::ExternalService,
            err.to_string(),
            err,
        ))
    })?;

    info!(username = %username, "Identity registered");
    Ok(Json(MessageResponse::new("Account created successfully!")))
}

/// GET /auth/{token}
///
/// Accepts only a verified `auth` marker token.
pub async fn auth_from_token(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    match state.tokens.verify(&token).await {
        Ok(verified) if verified.is_marker(MarkerPurpose::Auth) => {
            Ok(Json(MessageResponse::new("Successfully logged in!.")))
        }
        Ok(_) => {
            debug!("Token link carries claims instead of an auth marker");
            Err(invalid_token())
        }
        Err(err) => {
            debug!(error = %err, "Token link rejected");
            Err(invalid_token())
        }
    }
}

/// POST /auth/link
///
/// Mints a short-lived `auth` marker for the current session.
pub async fn auth_link(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<LinkResponse>, ApiError> {
    let token = state.tokens.issue_marker(MarkerPurpose::Auth).await?;
    info!(username = principal.username(), "Login link issued");

    Ok(Json(LinkResponse {
        path: format!("/auth/{token}"),
        token,
        expires_in_seconds: state.config.auth.marker_ttl_seconds,
    }))
}

fn invalid_token() -> ApiError {
    ApiError(AppError::authentication("Invalid Token."))
}
