//! Shared fixtures for unit tests.

use std::path::PathBuf;

use wsso_core::config::{AuthConfig, SigningAlgorithm, TokenCookieConfig};

use crate::jwt::{KeyMaterial, KeyRing, TokenService};

pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../tests/fixtures/keys")
        .join(name)
}

pub fn fixture(name: &str) -> Vec<u8> {
    std::fs::read(fixture_path(name)).expect("key fixture")
}

pub fn auth_config() -> AuthConfig {
    AuthConfig {
        private_key_path: fixture_path("ed25519_private.pem").display().to_string(),
        public_key_path: fixture_path("ed25519_public.pem").display().to_string(),
        algorithm: SigningAlgorithm::EdDsa,
        issuer: "wsso".to_string(),
        token_ttl_minutes: 60,
        marker_ttl_seconds: 120,
        leeway_seconds: 0,
        admin_group: "admins".to_string(),
        token_cookie: TokenCookieConfig::default(),
    }
}

pub fn ed25519_material() -> KeyMaterial {
    KeyMaterial::from_pem(
        SigningAlgorithm::EdDsa,
        &fixture("ed25519_private.pem"),
        &fixture("ed25519_public.pem"),
    )
    .expect("ed25519 fixture")
}

pub fn rotated_material() -> KeyMaterial {
    KeyMaterial::from_pem(
        SigningAlgorithm::EdDsa,
        &fixture("ed25519_rotated_private.pem"),
        &fixture("ed25519_rotated_public.pem"),
    )
    .expect("rotated fixture")
}

pub fn token_service() -> TokenService {
    TokenService::new(KeyRing::new(ed25519_material()), &auth_config())
}
