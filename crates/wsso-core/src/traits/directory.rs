//! Identity directory trait for pluggable credential and group backends.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::{AppError, ErrorKind};

/// Failures reported by a directory backend.
///
/// `Display` output is safe to show to callers; connection details stay in
/// the `detail` fields and are only logged.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DirectoryError {
    /// The supplied username/password pair was rejected.
    #[error("Incorrect username or password.")]
    InvalidCredentials,
    /// No identity with the given name exists.
    #[error("User '{0}' does not exist.")]
    NotFound(String),
    /// An identity with the given name already exists.
    #[error("User '{0}' already exists.")]
    AlreadyExists(String),
    /// The privileged directory credential was rejected.
    #[error("Directory rejected the manager credential.")]
    Unauthorized,
    /// The backend could not be reached.
    #[error("Directory unavailable.")]
    Unavailable {
        /// Diagnostic detail for logs.
        detail: String,
    },
    /// The call did not complete within the configured bound.
    #[error("Directory timed out.")]
    Timeout,
    /// Any other backend failure.
    #[error("Directory operation failed.")]
    Backend {
        /// Diagnostic detail for logs.
        detail: String,
    },
}

impl DirectoryError {
    /// Whether repeating the same call may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable { .. } | Self::Timeout)
    }

    /// Diagnostic detail for logging, if any.
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Unavailable { detail } | Self::Backend { detail } => Some(detail),
            _ => None,
        }
    }
}

impl From<DirectoryError> for AppError {
    fn from(err: DirectoryError) -> Self {
        let kind = match &err {
            DirectoryError::InvalidCredentials => ErrorKind::Authentication,
            DirectoryError::NotFound(_) => ErrorKind::NotFound,
            DirectoryError::AlreadyExists(_) => ErrorKind::Conflict,
            DirectoryError::Unauthorized
            | DirectoryError::Unavailable { .. }
            | DirectoryError::Timeout
            | DirectoryError::Backend { .. } => ErrorKind::ExternalService,
        };
        let message = err.to_string();
        AppError::with_source(kind, message, err)
    }
}

/// Registration request handed to the directory.
#[derive(Clone, Serialize, Deserialize)]
pub struct NewIdentity {
    /// Login name.
    pub username: String,
    /// Plaintext password; the directory is responsible for hashing it.
    pub password: String,
    /// Contact address.
    pub email: String,
}

impl std::fmt::Debug for NewIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewIdentity")
            .field("username", &self.username)
            .field("email", &self.email)
            .finish()
    }
}

/// Public view of an identity returned by administrative listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentitySummary {
    /// Login name.
    pub username: String,
    /// Contact address.
    pub email: Option<String>,
    /// Group memberships.
    pub groups: Vec<String>,
}

/// Trait for identity directories (LDAP-like, in-memory, or wrapped).
///
/// Connections, if any, are acquired and released within each call.
#[async_trait]
pub trait Directory: Send + Sync + std::fmt::Debug + 'static {
    /// Verify a username/password pair.
    async fn bind(&self, username: &str, password: &str) -> Result<(), DirectoryError>;

    /// Return the names of all groups the identity belongs to.
    async fn group_membership(&self, username: &str) -> Result<Vec<String>, DirectoryError>;

    /// Check membership of the identity in a single group.
    async fn is_member_of(&self, username: &str, group: &str) -> Result<bool, DirectoryError>;

    /// Create a new identity.
    async fn register(&self, identity: NewIdentity) -> Result<(), DirectoryError>;

    /// List all identities. Requires the directory manager secret.
    async fn list_identities(
        &self,
        manager_password: &str,
    ) -> Result<Vec<IdentitySummary>, DirectoryError>;

    /// Delete an identity and return a confirmation message.
    /// Requires the directory manager secret.
    async fn delete_identity(
        &self,
        username: &str,
        manager_password: &str,
    ) -> Result<String, DirectoryError>;
}
