//! Builds token claims from live directory lookups.

use std::sync::Arc;

use tracing::{debug, warn};

use wsso_core::error::{AppError, ErrorKind};
use wsso_core::result::AppResult;
use wsso_core::traits::{Directory, DirectoryError};

use crate::jwt::Claims;

/// Assembles [`Claims`] for a freshly authenticated identity.
#[derive(Debug, Clone)]
pub struct ClaimBuilder {
    directory: Arc<dyn Directory>,
    admin_group: String,
}

impl ClaimBuilder {
    /// Creates a builder granting admin to members of `admin_group`.
    pub fn new(directory: Arc<dyn Directory>, admin_group: impl Into<String>) -> Self {
        Self {
            directory,
            admin_group: admin_group.into(),
        }
    }

    /// Looks up groups and admin membership for `username`.
    ///
    /// Lookup failures are returned, never papered over with a
    /// non-admin default.
    pub async fn build(&self, username: &str) -> AppResult<Claims> {
        let groups = self
            .directory
            .group_membership(username)
            .await
            .map_err(|e| lookup_failed(username, "group membership", e))?;

        let admin = self
            .directory
            .is_member_of(username, &self.admin_group)
            .await
            .map_err(|e| lookup_failed(username, "admin membership", e))?;

        debug!(username, groups = groups.len(), admin, "Claims built");
        Ok(Claims::new(username, groups, admin))
    }
}

fn lookup_failed(username: &str, lookup: &str, err: DirectoryError) -> AppError {
    warn!(
        username,
        lookup,
        error = %err,
        detail = err.detail().unwrap_or_default(),
        "Claim lookup failed"
    );
    AppError::with_source(ErrorKind::ExternalService, "Failed to generate JWT", err)
}
