//! Signing key material and the rotatable key ring.

use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey};
use sha2::{Digest, Sha256};
use tokio::sync::RwLock;
use tracing::info;

use wsso_core::config::{AuthConfig, SigningAlgorithm};
use wsso_core::error::{AppError, ErrorKind};
use wsso_core::result::AppResult;

/// Number of digest bytes used to derive a key id.
const KID_BYTES: usize = 12;

/// An asymmetric key pair ready for signing and verification.
pub struct KeyMaterial {
    kid: String,
    algorithm: Algorithm,
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl std::fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyMaterial")
            .field("kid", &self.kid)
            .field("algorithm", &self.algorithm)
            .finish()
    }
}

impl KeyMaterial {
    /// Parses a PEM key pair for the given algorithm.
    ///
    /// The key id is derived from the public key so both sides of a
    /// deployment agree on it without extra configuration.
    pub fn from_pem(
        algorithm: SigningAlgorithm,
        private_pem: &[u8],
        public_pem: &[u8],
    ) -> AppResult<Self> {
        let (algorithm, encoding, decoding) = match algorithm {
            SigningAlgorithm::EdDsa => (
                Algorithm::EdDSA,
                EncodingKey::from_ed_pem(private_pem),
                DecodingKey::from_ed_pem(public_pem),
            ),
            SigningAlgorithm::Rs256 => (
                Algorithm::RS256,
                EncodingKey::from_rsa_pem(private_pem),
                DecodingKey::from_rsa_pem(public_pem),
            ),
            SigningAlgorithm::Es256 => (
                Algorithm::ES256,
                EncodingKey::from_ec_pem(private_pem),
                DecodingKey::from_ec_pem(public_pem),
            ),
        };

        let encoding = encoding.map_err(|e| {
            AppError::with_source(ErrorKind::Configuration, "Invalid private signing key", e)
        })?;
        let decoding = decoding.map_err(|e| {
            AppError::with_source(ErrorKind::Configuration, "Invalid public verification key", e)
        })?;

        Ok(Self {
            kid: key_id(public_pem),
            algorithm,
            encoding,
            decoding,
        })
    }

    /// Reads the key pair named by the auth configuration.
    pub async fn from_files(config: &AuthConfig) -> AppResult<Self> {
        let private_pem = read_pem(&config.private_key_path).await?;
        let public_pem = read_pem(&config.public_key_path).await?;
        Self::from_pem(config.algorithm, &private_pem, &public_pem)
    }

    /// Key id written into token headers.
    pub fn kid(&self) -> &str {
        &self.kid
    }

    /// JOSE algorithm of this key pair.
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub(crate) fn encoding_key(&self) -> &EncodingKey {
        &self.encoding
    }

    pub(crate) fn decoding_key(&self) -> &DecodingKey {
        &self.decoding
    }
}

async fn read_pem(path: &str) -> AppResult<Vec<u8>> {
    tokio::fs::read(path).await.map_err(|e| {
        AppError::with_source(
            ErrorKind::Configuration,
            format!("Failed to read key file '{path}'"),
            e,
        )
    })
}

fn key_id(public_pem: &[u8]) -> String {
    let digest = Sha256::digest(public_pem.trim_ascii());
    URL_SAFE_NO_PAD.encode(&digest[..KID_BYTES])
}

#[derive(Debug)]
struct KeySet {
    current: Arc<KeyMaterial>,
    previous: Option<Arc<KeyMaterial>>,
}

/// Current signing key plus the key it replaced.
///
/// New tokens are always signed with the current key. Tokens signed with
/// the previous key keep verifying until they expire, so a rotation never
/// logs anyone out.
#[derive(Debug, Clone)]
pub struct KeyRing {
    inner: Arc<RwLock<KeySet>>,
}

impl KeyRing {
    /// Creates a ring holding a single key.
    pub fn new(current: KeyMaterial) -> Self {
        Self {
            inner: Arc::new(RwLock::new(KeySet {
                current: Arc::new(current),
                previous: None,
            })),
        }
    }

    /// Loads the configured key pair from disk.
    pub async fn load(config: &AuthConfig) -> AppResult<Self> {
        let material = KeyMaterial::from_files(config).await?;
        info!(kid = %material.kid(), algorithm = %config.algorithm, "Signing key loaded");
        Ok(Self::new(material))
    }

    /// Key used to sign new tokens.
    pub async fn signing_key(&self) -> Arc<KeyMaterial> {
        Arc::clone(&self.inner.read().await.current)
    }

    /// Key matching a token header's `kid`.
    ///
    /// Headers without a `kid` are checked against the current key.
    pub async fn verification_key(&self, kid: Option<&str>) -> Option<Arc<KeyMaterial>> {
        let keys = self.inner.read().await;
        match kid {
            None => Some(Arc::clone(&keys.current)),
            Some(kid) if keys.current.kid() == kid => Some(Arc::clone(&keys.current)),
            Some(kid) => keys
                .previous
                .as_ref()
                .filter(|previous| previous.kid() == kid)
                .map(Arc::clone),
        }
    }

    /// Id of the current signing key.
    pub async fn current_kid(&self) -> String {
        self.inner.read().await.current.kid().to_string()
    }

    /// Installs a new signing key, demoting the current one to verify-only.
    ///
    /// Installing a key with the current id is a no-op.
    pub async fn rotate(&self, next: KeyMaterial) {
        let mut keys = self.inner.write().await;
        if keys.current.kid() == next.kid() {
            return;
        }
        let next = Arc::new(next);
        let retired = std::mem::replace(&mut keys.current, next);
        info!(
            kid = %keys.current.kid(),
            retired = %retired.kid(),
            "Signing key rotated"
        );
        keys.previous = Some(retired);
    }

    /// Re-reads the configured key files and rotates to them.
    ///
    /// On failure the ring is left untouched.
    pub async fn reload(&self, config: &AuthConfig) -> AppResult<String> {
        let material = KeyMaterial::from_files(config).await?;
        let kid = material.kid().to_string();
        self.rotate(material).await;
        Ok(kid)
    }
}
