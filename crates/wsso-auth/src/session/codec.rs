//! HMAC-signed encoding of session values into a cookie string.

use std::collections::BTreeMap;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::debug;

use wsso_core::error::AppError;
use wsso_core::result::AppResult;

type HmacSha256 = Hmac<Sha256>;

/// Largest cookie value the codec will produce.
pub const MAX_COOKIE_BYTES: usize = 4096;

/// Encodes session values as `base64url(json).base64url(hmac)`.
#[derive(Clone)]
pub struct SessionCodec {
    key: Vec<u8>,
}

impl std::fmt::Debug for SessionCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionCodec").finish_non_exhaustive()
    }
}

impl SessionCodec {
    /// Creates a codec keyed by the session secret.
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        Self {
            key: secret.as_ref().to_vec(),
        }
    }

    /// Serializes and signs the values.
    ///
    /// Fails when the result would not fit in a single cookie.
    pub fn encode(&self, values: &BTreeMap<String, String>) -> AppResult<String> {
        let body = URL_SAFE_NO_PAD.encode(serde_json::to_vec(values)?);
        let mut mac = self.mac()?;
        mac.update(body.as_bytes());
        let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

        let encoded = format!("{body}.{signature}");
        if encoded.len() > MAX_COOKIE_BYTES {
            return Err(AppError::session(format!(
                "Session cookie of {} bytes exceeds the {MAX_COOKIE_BYTES} byte limit",
                encoded.len()
            )));
        }
        Ok(encoded)
    }

    /// Verifies and deserializes a cookie value.
    ///
    /// Returns `None` for anything unsigned, tampered, or unparsable.
    pub fn decode(&self, value: &str) -> Option<BTreeMap<String, String>> {
        let (body, signature) = value.split_once('.')?;
        let signature = URL_SAFE_NO_PAD.decode(signature).ok()?;

        let mut mac = self.mac().ok()?;
        mac.update(body.as_bytes());
        if mac.verify_slice(&signature).is_err() {
            debug!("Session cookie failed signature check");
            return None;
        }

        let json = URL_SAFE_NO_PAD.decode(body).ok()?;
        serde_json::from_slice(&json).ok()
    }

    fn mac(&self) -> AppResult<HmacSha256> {
        HmacSha256::new_from_slice(&self.key)
            .map_err(|_| AppError::configuration("Invalid session secret"))
    }
}
