//! Identity directory configuration.

use serde::{Deserialize, Serialize};

/// Identity directory configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct DirectoryConfig {
    /// Secret authorizing privileged directory operations (list, delete).
    #[serde(default)]
    pub manager_password: String,
    /// Upper bound for a single directory call in milliseconds.
    #[serde(default = "default_timeout")]
    pub timeout_ms: u64,
    /// Retries for idempotent calls that failed with a retryable error.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Base delay of the exponential backoff in milliseconds.
    #[serde(default = "default_backoff")]
    pub retry_base_delay_ms: u64,
    /// Groups assigned to self-registered identities.
    #[serde(default = "default_groups")]
    pub default_groups: Vec<String>,
    /// Identities loaded into the directory at startup.
    #[serde(default)]
    pub identities: Vec<SeedIdentity>,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            manager_password: String::new(),
            timeout_ms: default_timeout(),
            max_retries: default_max_retries(),
            retry_base_delay_ms: default_backoff(),
            default_groups: default_groups(),
            identities: Vec::new(),
        }
    }
}

impl std::fmt::Debug for DirectoryConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectoryConfig")
            .field("manager_password", &"***")
            .field("timeout_ms", &self.timeout_ms)
            .field("max_retries", &self.max_retries)
            .field("retry_base_delay_ms", &self.retry_base_delay_ms)
            .field("default_groups", &self.default_groups)
            .field("identities", &self.identities.len())
            .finish()
    }
}

/// An identity provisioned from configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedIdentity {
    /// Login name.
    pub username: String,
    /// Argon2id PHC string (see `wsso-cli hash-password`).
    pub password_hash: String,
    /// Contact address.
    #[serde(default)]
    pub email: Option<String>,
    /// Group memberships.
    #[serde(default)]
    pub groups: Vec<String>,
}

fn default_timeout() -> u64 {
    3_000
}

fn default_max_retries() -> u32 {
    2
}

fn default_backoff() -> u64 {
    100
}

fn default_groups() -> Vec<String> {
    vec!["users".to_string()]
}
