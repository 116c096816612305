//! Access guards for protected routes.
//!
//! Each guarded surface names one [`CapabilityBackend`]. A request moves
//! from unauthenticated to session-active (valid session) to admin-verified
//! (valid claims token with the admin flag). The directory administration
//! surface uses a separate shared-secret backend.

pub mod claims;
pub mod secret;
pub mod session;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use wsso_core::error::{AppError, ErrorKind};

use crate::jwt::{Claims, TokenError};

pub use claims::ClaimsBackend;
pub use secret::{BasicAuthError, BasicCredentials, StaticSecretBackend};
pub use session::SessionBackend;

/// Credentials presented by a request, gathered by the transport layer.
#[derive(Debug, Clone, Default)]
pub struct GuardRequest {
    /// Identity found in the session, if any.
    pub session_identity: Option<String>,
    /// Token cookie value, if any.
    pub token: Option<String>,
    /// Parsed HTTP Basic credentials, if any.
    pub basic: Option<BasicCredentials>,
}

/// Who a guard let through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "access", rename_all = "snake_case")]
pub enum Principal {
    /// A valid session exists.
    SessionActive { username: String },
    /// A valid claims token with the admin flag was presented.
    AdminVerified { username: String, claims: Claims },
    /// The shared administration secret was presented.
    Operator { username: String },
}

impl Principal {
    /// Name of the authenticated party.
    pub fn username(&self) -> &str {
        match self {
            Self::SessionActive { username }
            | Self::AdminVerified { username, .. }
            | Self::Operator { username } => username,
        }
    }
}

/// Why a guard refused a request.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GuardRejection {
    #[error("no active session")]
    MissingSession,
    #[error("no token presented")]
    MissingToken,
    #[error("token rejected: {0}")]
    InvalidToken(#[from] TokenError),
    #[error("token does not carry claims")]
    WrongTokenPurpose,
    #[error("claims do not grant admin")]
    NotAdmin,
    #[error("credential rejected")]
    BadCredential,
}

impl GuardRejection {
    /// Error kind used when surfacing the rejection.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotAdmin => ErrorKind::Authorization,
            _ => ErrorKind::Authentication,
        }
    }
}

impl From<GuardRejection> for AppError {
    fn from(rejection: GuardRejection) -> Self {
        AppError::with_source(rejection.kind(), "Unauthorized", rejection)
    }
}

/// Strategy deciding whether a request may proceed.
#[async_trait]
pub trait CapabilityBackend: Send + Sync + std::fmt::Debug + 'static {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Admits or rejects the request.
    async fn authorize(&self, request: &GuardRequest) -> Result<Principal, GuardRejection>;
}
