//! Response DTOs.

use serde::{Deserialize, Serialize};

use wsso_core::traits::IdentitySummary;

/// Plain confirmation message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Human-readable outcome.
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Directory listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsersResponse {
    pub users: Vec<IdentitySummary>,
}

/// Identity of the current session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityResponse {
    pub username: String,
}

/// Short-lived, reusable verification link minted for the current session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkResponse {
    /// Marker token.
    pub token: String,
    /// Path that redeems the token.
    pub path: String,
    /// Seconds until the token expires.
    pub expires_in_seconds: u64,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}
