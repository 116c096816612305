//! Handlers behind the session and admin guards.

use axum::{Extension, Json};

use wsso_auth::{Claims, Principal};
use wsso_core::error::AppError;

use crate::dto::response::IdentityResponse;
use crate::error::ApiError;

/// GET /me
pub async fn me(Extension(principal): Extension<Principal>) -> Json<IdentityResponse> {
    Json(IdentityResponse {
        username: principal.username().to_string(),
    })
}

/// GET /admin/claims
///
/// Returns the verified claims snapshot of the admin token.
pub async fn admin_claims(
    Extension(principal): Extension<Principal>,
) -> Result<Json<Claims>, ApiError> {
    match principal {
        Principal::AdminVerified { claims, .. } => Ok(Json(claims)),
        _ => Err(ApiError(AppError::authorization("Unauthorized"))),
    }
}
