//! Token creation over opaque payload bytes.

use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::Utc;
use jsonwebtoken::{Header, encode};
use serde::{Deserialize, Serialize};

use wsso_core::config::AuthConfig;
use wsso_core::error::{AppError, ErrorKind};
use wsso_core::result::AppResult;

use super::keys::KeyRing;

/// Registered-claims envelope around the opaque payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct TokenEnvelope {
    pub iss: String,
    pub iat: i64,
    pub exp: i64,
    /// Base64url payload bytes.
    pub dat: String,
}

/// Signs payload bytes with the ring's current key.
#[derive(Debug, Clone)]
pub struct TokenIssuer {
    keys: KeyRing,
    issuer: String,
}

impl TokenIssuer {
    /// Creates an issuer from auth configuration.
    pub fn new(keys: KeyRing, config: &AuthConfig) -> Self {
        Self {
            keys,
            issuer: config.issuer.clone(),
        }
    }

    /// Creates a token carrying `payload` that expires `ttl` from now.
    pub async fn create(&self, ttl: Duration, payload: &[u8]) -> AppResult<String> {
        self.create_at(Utc::now().timestamp(), ttl, payload).await
    }

    /// Creates a token as if issued at `issued_at` (seconds since epoch).
    pub async fn create_at(
        &self,
        issued_at: i64,
        ttl: Duration,
        payload: &[u8],
    ) -> AppResult<String> {
        let expires_at = i64::try_from(ttl.as_secs())
            .ok()
            .and_then(|secs| issued_at.checked_add(secs))
            .ok_or_else(|| AppError::internal("Token lifetime out of range"))?;

        let key = self.keys.signing_key().await;
        let mut header = Header::new(key.algorithm());
        header.kid = Some(key.kid().to_string());

        let envelope = TokenEnvelope {
            iss: self.issuer.clone(),
            iat: issued_at,
            exp: expires_at,
            dat: URL_SAFE_NO_PAD.encode(payload),
        };

        encode(&header, &envelope, key.encoding_key())
            .map_err(|e| AppError::with_source(ErrorKind::Internal, "Failed to sign token", e))
    }
}
