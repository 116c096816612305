//! Admits requests with a session and an admin claims token.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::jwt::{TokenService, VerifiedToken};

use super::{CapabilityBackend, GuardRejection, GuardRequest, Principal};

/// Grants `AdminVerified` from the signed claims snapshot.
///
/// The admin flag is not re-checked against the directory.
#[derive(Debug, Clone)]
pub struct ClaimsBackend {
    tokens: Arc<TokenService>,
}

impl ClaimsBackend {
    /// Creates a backend verifying tokens with the given service.
    pub fn new(tokens: Arc<TokenService>) -> Self {
        Self { tokens }
    }
}

#[async_trait]
impl CapabilityBackend for ClaimsBackend {
    fn name(&self) -> &'static str {
        "claims"
    }

    async fn authorize(&self, request: &GuardRequest) -> Result<Principal, GuardRejection> {
        let session_user = request
            .session_identity
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or(GuardRejection::MissingSession)?;

        let token = request
            .token
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or(GuardRejection::MissingToken)?;

        let claims = match self.tokens.verify(token).await? {
            VerifiedToken::Claims(claims) => claims,
            VerifiedToken::Marker(purpose) => {
                debug!(%purpose, "Marker token presented to admin guard");
                return Err(GuardRejection::WrongTokenPurpose);
            }
        };

        if !claims.is_admin() {
            debug!(username = %claims.username, session = session_user, "Claims lack admin");
            return Err(GuardRejection::NotAdmin);
        }

        Ok(Principal::AdminVerified {
            username: claims.username.clone(),
            claims,
        })
    }
}
