//! Typed token operations on top of the byte-level issuer and validator.

use std::time::Duration;

use tracing::debug;

use wsso_core::config::AuthConfig;
use wsso_core::result::AppResult;

use super::claims::{Claims, MarkerPurpose, TokenPayload, VerifiedToken};
use super::issuer::TokenIssuer;
use super::keys::KeyRing;
use super::validator::{TokenError, TokenValidator};

/// Issues and verifies claims and marker tokens.
#[derive(Debug, Clone)]
pub struct TokenService {
    issuer: TokenIssuer,
    validator: TokenValidator,
    claims_ttl: Duration,
    marker_ttl: Duration,
}

impl TokenService {
    /// Creates a token service sharing the given key ring.
    pub fn new(keys: KeyRing, config: &AuthConfig) -> Self {
        Self {
            issuer: TokenIssuer::new(keys.clone(), config),
            validator: TokenValidator::new(keys, config),
            claims_ttl: Duration::from_secs(config.token_ttl_minutes.saturating_mul(60)),
            marker_ttl: Duration::from_secs(config.marker_ttl_seconds),
        }
    }

    /// Signs a claims token with the configured claims lifetime.
    pub async fn issue_claims(&self, claims: &Claims) -> AppResult<String> {
        self.issue(&TokenPayload::Claims(claims.clone()), self.claims_ttl)
            .await
    }

    /// Signs a marker token with the configured marker lifetime.
    pub async fn issue_marker(&self, purpose: MarkerPurpose) -> AppResult<String> {
        self.issue(&TokenPayload::Marker { purpose }, self.marker_ttl)
            .await
    }

    /// Signs an arbitrary payload with an explicit lifetime.
    pub async fn issue(&self, payload: &TokenPayload, ttl: Duration) -> AppResult<String> {
        let bytes = serde_json::to_vec(payload)?;
        self.issuer.create(ttl, &bytes).await
    }

    /// Verifies a token and decodes its payload.
    pub async fn verify(&self, token: &str) -> Result<VerifiedToken, TokenError> {
        let bytes = self.validator.validate(token).await?;
        let payload: TokenPayload = serde_json::from_slice(&bytes).map_err(|e| {
            debug!(error = %e, "Verified token carries an unknown payload");
            TokenError::UnknownPayload
        })?;
        Ok(payload.into())
    }

    /// Underlying byte-level issuer.
    pub fn issuer(&self) -> &TokenIssuer {
        &self.issuer
    }
}
