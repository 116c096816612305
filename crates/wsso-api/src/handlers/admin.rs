//! Directory administration handlers (Basic shared-secret guarded).

use axum::extract::{Path, State};
use axum::{Extension, Json};
use tracing::{info, warn};

use wsso_auth::Principal;
use wsso_core::error::{AppError, ErrorKind};

use crate::dto::response::{MessageResponse, UsersResponse};
use crate::error::ApiError;
use crate::state::AppState;

/// GET /directory/users
pub async fn list_users(State(state): State<AppState>) -> Result<Json<UsersResponse>, ApiError> {
    let users = state
        .directory
        .list_identities(&state.config.directory.manager_password)
        .await
        .map_err(|err| {
            warn!(error = %err, detail = err.detail().unwrap_or_default(), "Listing identities failed");
            AppError::with_source(ErrorKind::ExternalService, "Failed to get users.", err)
        })?;

    Ok(Json(UsersResponse { users }))
}

/// DELETE /directory/users/{username}
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(operator): Extension<Principal>,
    Path(username): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let message = state
        .directory
        .delete_identity(&username, &state.config.directory.manager_password)
        .await
        .map_err(|err| {
            warn!(username = %username, error = %err, "Deleting identity failed");
            err
        })?;

    info!(username = %username, operator = operator.username(), "Identity deleted");
    Ok(Json(MessageResponse::new(message)))
}
