//! # wsso-auth
//!
//! Authentication and authorization core for WSSO.
//!
//! ## Modules
//!
//! - `jwt`: claims model, key ring, token issuance and validation
//! - `session`: signed cookie session store and the session manager
//! - `claim_builder`: assembles claims from live directory lookups
//! - `guard`: capability backends gating protected, admin, and directory routes

pub mod claim_builder;
pub mod guard;
pub mod jwt;
pub mod session;

#[cfg(test)]
pub(crate) mod test_support;

pub use claim_builder::ClaimBuilder;
pub use guard::{
    BasicCredentials, CapabilityBackend, ClaimsBackend, GuardRejection, GuardRequest, Principal,
    SessionBackend, StaticSecretBackend,
};
pub use jwt::{
    Claims, KeyMaterial, KeyRing, MarkerPurpose, TokenError, TokenIssuer, TokenPayload,
    TokenService, TokenValidator, VerifiedToken,
};
pub use session::{CookieSession, LogoutOutcome, SessionCodec, SessionManager, SessionStore};
