//! In-process identity directory.

use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use wsso_core::config::DirectoryConfig;
use wsso_core::error::AppError;
use wsso_core::result::AppResult;
use wsso_core::traits::{Directory, DirectoryError, IdentitySummary, NewIdentity};

use crate::password::PasswordHasher;

/// Hash of a random discarded password at the default Argon2id cost.
///
/// Verified against when the username is unknown, so lookups for missing
/// and existing identities cost the same.
const DECOY_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$YWRhMzY1YTAwNmY0YTAxZA$a3UV7IhMMNY1x/uuuFbzkICHDXVjxOAbfeNnkKma9h0";

#[derive(Debug, Clone)]
struct StoredIdentity {
    password_hash: String,
    email: Option<String>,
    groups: BTreeSet<String>,
}

impl StoredIdentity {
    fn summary(&self, username: &str) -> IdentitySummary {
        IdentitySummary {
            username: username.to_string(),
            email: self.email.clone(),
            groups: self.groups.iter().cloned().collect(),
        }
    }
}

/// Directory holding identities in memory, seeded from configuration.
///
/// Passwords are stored as Argon2id hashes. Privileged operations require
/// the manager secret.
pub struct MemoryDirectory {
    identities: RwLock<BTreeMap<String, StoredIdentity>>,
    hasher: PasswordHasher,
    manager_digest: Option<[u8; 32]>,
    default_groups: Vec<String>,
}

impl std::fmt::Debug for MemoryDirectory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryDirectory")
            .field("default_groups", &self.default_groups)
            .finish_non_exhaustive()
    }
}

impl MemoryDirectory {
    /// Creates an empty directory.
    ///
    /// An empty manager password disables every privileged operation.
    pub fn new(manager_password: &str, default_groups: Vec<String>) -> Self {
        let manager_digest = (!manager_password.is_empty()).then(|| digest(manager_password));

        Self {
            identities: RwLock::new(BTreeMap::new()),
            hasher: PasswordHasher::new(),
            manager_digest,
            default_groups,
        }
    }

    /// Creates a directory seeded with the configured identities.
    pub fn from_config(config: &DirectoryConfig) -> AppResult<Self> {
        let mut directory = Self::new(&config.manager_password, config.default_groups.clone());
        let identities = directory.identities.get_mut();

        for seed in &config.identities {
            directory.hasher.check_hash(&seed.password_hash).map_err(|e| {
                AppError::configuration(format!(
                    "Seed identity '{}': {}",
                    seed.username, e.message
                ))
            })?;
            identities.insert(
                seed.username.clone(),
                StoredIdentity {
                    password_hash: seed.password_hash.clone(),
                    email: seed.email.clone(),
                    groups: seed.groups.iter().cloned().collect(),
                },
            );
        }

        info!(count = identities.len(), "Directory seeded");
        Ok(directory)
    }

    fn check_manager(&self, secret: &str) -> Result<(), DirectoryError> {
        let Some(expected) = self.manager_digest else {
            warn!("Privileged directory call with no manager password configured");
            return Err(DirectoryError::Unauthorized);
        };
        if bool::from(digest(secret)[..].ct_eq(&expected[..])) {
            Ok(())
        } else {
            Err(DirectoryError::Unauthorized)
        }
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, DirectoryError> {
        self.hasher
            .verify_password(password, hash)
            .map_err(|e| DirectoryError::Backend { detail: e.message })
    }
}

fn digest(value: &str) -> [u8; 32] {
    Sha256::digest(value.as_bytes()).into()
}

#[async_trait]
impl Directory for MemoryDirectory {
    async fn bind(&self, username: &str, password: &str) -> Result<(), DirectoryError> {
        let stored_hash = self
            .identities
            .read()
            .await
            .get(username)
            .map(|identity| identity.password_hash.clone());

        match stored_hash {
            Some(hash) if self.verify(password, &hash)? => Ok(()),
            Some(_) => {
                debug!(username, "Password mismatch");
                Err(DirectoryError::InvalidCredentials)
            }
            None => {
                let _ = self.verify(password, DECOY_HASH);
                debug!(username, "Unknown identity");
                Err(DirectoryError::InvalidCredentials)
            }
        }
    }

    async fn group_membership(&self, username: &str) -> Result<Vec<String>, DirectoryError> {
        self.identities
            .read()
            .await
            .get(username)
            .map(|identity| identity.groups.iter().cloned().collect())
            .ok_or_else(|| DirectoryError::NotFound(username.to_string()))
    }

    async fn is_member_of(&self, username: &str, group: &str) -> Result<bool, DirectoryError> {
        self.identities
            .read()
            .await
            .get(username)
            .map(|identity| identity.groups.contains(group))
            .ok_or_else(|| DirectoryError::NotFound(username.to_string()))
    }

    async fn register(&self, identity: NewIdentity) -> Result<(), DirectoryError> {
        let password_hash = self
            .hasher
            .hash_password(&identity.password)
            .map_err(|e| DirectoryError::Backend { detail: e.message })?;

        let mut identities = self.identities.write().await;
        if identities.contains_key(&identity.username) {
            return Err(DirectoryError::AlreadyExists(identity.username));
        }
        identities.insert(
            identity.username.clone(),
            StoredIdentity {
                password_hash,
                email: Some(identity.email).filter(|e| !e.is_empty()),
                groups: self.default_groups.iter().cloned().collect(),
            },
        );
        info!(username = %identity.username, "Identity registered");
        Ok(())
    }

    async fn list_identities(
        &self,
        manager_password: &str,
    ) -> Result<Vec<IdentitySummary>, DirectoryError> {
        self.check_manager(manager_password)?;
        Ok(self
            .identities
            .read()
            .await
            .iter()
            .map(|(username, identity)| identity.summary(username))
            .collect())
    }

    async fn delete_identity(
        &self,
        username: &str,
        manager_password: &str,
    ) -> Result<String, DirectoryError> {
        self.check_manager(manager_password)?;
        if self.identities.write().await.remove(username).is_none() {
            return Err(DirectoryError::NotFound(username.to_string()));
        }
        info!(username, "Identity deleted");
        Ok(format!("User '{username}' deleted successfully."))
    }
}
