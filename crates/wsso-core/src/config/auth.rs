//! Token signing configuration.

use serde::{Deserialize, Serialize};

/// Asymmetric signing algorithm used for issued tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SigningAlgorithm {
    /// Ed25519 signatures.
    #[serde(rename = "EdDSA")]
    EdDsa,
    /// RSASSA-PKCS1-v1_5 with SHA-256.
    #[serde(rename = "RS256")]
    Rs256,
    /// ECDSA over P-256 with SHA-256.
    #[serde(rename = "ES256")]
    Es256,
}

impl Default for SigningAlgorithm {
    fn default() -> Self {
        Self::EdDsa
    }
}

impl std::fmt::Display for SigningAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EdDsa => write!(f, "EdDSA"),
            Self::Rs256 => write!(f, "RS256"),
            Self::Es256 => write!(f, "ES256"),
        }
    }
}

/// Token issuance and verification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Path to the PEM-encoded private signing key.
    pub private_key_path: String,
    /// Path to the PEM-encoded public verification key.
    pub public_key_path: String,
    /// Signing algorithm matching the key pair.
    #[serde(default)]
    pub algorithm: SigningAlgorithm,
    /// Issuer written into and required from every token.
    #[serde(default = "default_issuer")]
    pub issuer: String,
    /// Lifetime of claims tokens in minutes.
    #[serde(default = "default_token_ttl")]
    pub token_ttl_minutes: u64,
    /// Lifetime of `auth` marker tokens in seconds.
    #[serde(default = "default_marker_ttl")]
    pub marker_ttl_seconds: u64,
    /// Clock-skew leeway added to expiry checks, in seconds. Zero by default.
    #[serde(default = "default_leeway")]
    pub leeway_seconds: u64,
    /// Directory group whose members receive the admin claim.
    #[serde(default = "default_admin_group")]
    pub admin_group: String,
    /// Token cookie attributes.
    #[serde(default)]
    pub token_cookie: TokenCookieConfig,
}

/// Attributes of the cookie carrying the signed token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenCookieConfig {
    /// Cookie name.
    #[serde(default = "default_cookie_name")]
    pub name: String,
    /// Cookie `Max-Age` in seconds.
    #[serde(default = "default_cookie_max_age")]
    pub max_age_seconds: i64,
    /// Cookie `Path`.
    #[serde(default = "default_cookie_path")]
    pub path: String,
    /// Optional cookie `Domain`.
    #[serde(default)]
    pub domain: Option<String>,
    /// Whether the cookie is restricted to HTTPS.
    #[serde(default)]
    pub secure: bool,
}

impl Default for TokenCookieConfig {
    fn default() -> Self {
        Self {
            name: default_cookie_name(),
            max_age_seconds: default_cookie_max_age(),
            path: default_cookie_path(),
            domain: None,
            secure: false,
        }
    }
}

fn default_issuer() -> String {
    "wsso".to_string()
}

fn default_token_ttl() -> u64 {
    60
}

fn default_marker_ttl() -> u64 {
    120
}

fn default_leeway() -> u64 {
    0
}

fn default_admin_group() -> String {
    "admins".to_string()
}

fn default_cookie_name() -> String {
    "token".to_string()
}

fn default_cookie_max_age() -> i64 {
    86_400
}

fn default_cookie_path() -> String {
    "/".to_string()
}
