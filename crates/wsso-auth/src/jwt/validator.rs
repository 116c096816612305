//! Token signature, issuer, and expiry validation.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::Utc;
use jsonwebtoken::errors::ErrorKind as JwtErrorKind;
use jsonwebtoken::{Algorithm, Validation, decode, decode_header};
use thiserror::Error;
use tracing::debug;

use wsso_core::config::AuthConfig;

use super::issuer::TokenEnvelope;
use super::keys::KeyRing;

/// Why a token was rejected.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum TokenError {
    /// Not a well-formed token.
    #[error("token is malformed")]
    Malformed,
    /// Signature does not verify against any trusted key.
    #[error("token signature is invalid")]
    BadSignature,
    /// Lifetime has elapsed.
    #[error("token has expired")]
    Expired,
    /// Payload verified but is neither claims nor a known marker.
    #[error("token payload is not recognized")]
    UnknownPayload,
}

/// Verifies tokens against the key ring and returns their payload bytes.
#[derive(Debug, Clone)]
pub struct TokenValidator {
    keys: KeyRing,
    issuer: String,
    leeway_seconds: u64,
}

impl TokenValidator {
    /// Creates a validator from auth configuration.
    pub fn new(keys: KeyRing, config: &AuthConfig) -> Self {
        Self {
            keys,
            issuer: config.issuer.clone(),
            leeway_seconds: config.leeway_seconds,
        }
    }

    /// Validates a token and returns the exact payload bytes it was created with.
    ///
    /// Checks, in order:
    /// 1. Header parses and names a trusted key
    /// 2. Signature validity
    /// 3. Issuer and expiration
    pub async fn validate(&self, token: &str) -> Result<Vec<u8>, TokenError> {
        let header = decode_header(token).map_err(|_| TokenError::Malformed)?;

        let key = self
            .keys
            .verification_key(header.kid.as_deref())
            .await
            .ok_or_else(|| {
                debug!(kid = ?header.kid, "Token signed by unknown key");
                TokenError::BadSignature
            })?;

        let validation = self.validation_for(key.algorithm());
        let data = decode::<TokenEnvelope>(token, key.decoding_key(), &validation)
            .map_err(|e| classify(e.kind()))?;

        // jsonwebtoken still accepts a token at exactly `exp`
        let deadline = data.claims.exp.saturating_add_unsigned(self.leeway_seconds);
        if Utc::now().timestamp() >= deadline {
            return Err(TokenError::Expired);
        }

        URL_SAFE_NO_PAD
            .decode(data.claims.dat)
            .map_err(|_| TokenError::Malformed)
    }

    fn validation_for(&self, algorithm: Algorithm) -> Validation {
        let mut validation = Validation::new(algorithm);
        validation.validate_exp = true;
        validation.leeway = self.leeway_seconds;
        validation.set_issuer(&[&self.issuer]);
        validation.set_required_spec_claims(&["exp", "iss"]);
        validation
    }
}

fn classify(kind: &JwtErrorKind) -> TokenError {
    match kind {
        JwtErrorKind::ExpiredSignature => TokenError::Expired,
        JwtErrorKind::InvalidSignature | JwtErrorKind::InvalidAlgorithm => {
            TokenError::BadSignature
        }
        _ => TokenError::Malformed,
    }
}
