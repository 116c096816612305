//! HTTP Basic shared-secret backend for directory administration.

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use tracing::warn;

use wsso_core::config::AdminConfig;

use super::{CapabilityBackend, GuardRejection, GuardRequest, Principal};

/// Credentials extracted from a Basic `Authorization` header.
#[derive(Clone, PartialEq, Eq)]
pub struct BasicCredentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for BasicCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasicCredentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Reasons a Basic header could not be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum BasicAuthError {
    #[error("Not Basic authentication")]
    NotBasicAuth,
    #[error("Invalid base64 encoding")]
    InvalidEncoding,
    #[error("Invalid credentials format")]
    InvalidFormat,
}

impl BasicCredentials {
    /// Parses an `Authorization` header value of the form `Basic <base64>`.
    pub fn from_header(value: &str) -> Result<Self, BasicAuthError> {
        let encoded = value
            .strip_prefix("Basic ")
            .ok_or(BasicAuthError::NotBasicAuth)?;

        let decoded = BASE64
            .decode(encoded.trim())
            .map_err(|_| BasicAuthError::InvalidEncoding)?;
        let decoded = String::from_utf8(decoded).map_err(|_| BasicAuthError::InvalidEncoding)?;

        let (username, password) = decoded
            .split_once(':')
            .ok_or(BasicAuthError::InvalidFormat)?;

        Ok(Self {
            username: username.to_string(),
            password: password.to_string(),
        })
    }
}

/// Grants `Operator` when the Basic credential matches configuration.
///
/// Username and password are both compared as SHA-256 digests in constant
/// time, and a mismatch never reveals which of the two failed.
pub struct StaticSecretBackend {
    username: String,
    username_digest: [u8; 32],
    password_digest: [u8; 32],
}

impl std::fmt::Debug for StaticSecretBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticSecretBackend")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

impl StaticSecretBackend {
    /// Creates a backend expecting the configured admin credential.
    pub fn new(config: &AdminConfig) -> Self {
        Self {
            username: config.username.clone(),
            username_digest: digest(&config.username),
            password_digest: digest(&config.password),
        }
    }

    fn matches(&self, credentials: &BasicCredentials) -> bool {
        let username = digest(&credentials.username);
        let password = digest(&credentials.password);
        let ok = username[..].ct_eq(&self.username_digest[..])
            & password[..].ct_eq(&self.password_digest[..]);
        bool::from(ok)
    }
}

fn digest(value: &str) -> [u8; 32] {
    Sha256::digest(value.as_bytes()).into()
}

#[async_trait]
impl CapabilityBackend for StaticSecretBackend {
    fn name(&self) -> &'static str {
        "static_secret"
    }

    async fn authorize(&self, request: &GuardRequest) -> Result<Principal, GuardRejection> {
        let credentials = request
            .basic
            .as_ref()
            .ok_or(GuardRejection::BadCredential)?;

        if !self.matches(credentials) {
            warn!(username = %credentials.username, "Rejected directory admin credential");
            return Err(GuardRejection::BadCredential);
        }

        Ok(Principal::Operator {
            username: self.username.clone(),
        })
    }
}
