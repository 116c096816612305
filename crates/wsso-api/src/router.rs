//! Route definitions for the WSSO HTTP API.
//!
//! Routes are grouped by the guard that protects them. The router receives
//! `AppState` and passes it to all handlers via Axum's `State` extractor.

use axum::{
    Router, middleware as axum_middleware,
    routing::{delete, get, post},
};

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the Axum router with all routes and guards.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(auth_routes())
        .merge(session_routes(&state))
        .merge(admin_routes(&state))
        .merge(directory_routes(&state))
        .merge(health_routes())
        .layer(axum_middleware::from_fn(
            middleware::logging::request_logging,
        ))
        .with_state(state)
}

/// Unguarded login, logout, register, and token redemption
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(handlers::auth::login))
        .route("/logout", post(handlers::auth::logout))
        .route("/register", post(handlers::auth::register))
        .route("/auth/{token}", get(handlers::auth::auth_from_token))
}

/// Routes requiring an active session
fn session_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/me", get(handlers::protected::me))
        .route("/auth/link", post(handlers::auth::auth_link))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::guard::require_session,
        ))
}

/// Routes requiring a session and admin claims
fn admin_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/admin/claims", get(handlers::protected::admin_claims))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::guard::require_admin,
        ))
}

/// Directory administration behind the shared Basic credential
fn directory_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/directory/users", get(handlers::admin::list_users))
        .route(
            "/directory/users/{username}",
            delete(handlers::admin::delete_user),
        )
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::guard::require_directory_admin,
        ))
}

/// Health check
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}
