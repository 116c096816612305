//! Signed token issuance, validation, and the claims they carry.

pub mod claims;
pub mod issuer;
pub mod keys;
pub mod service;
pub mod validator;

pub use claims::{Claims, MarkerPurpose, TokenPayload, VerifiedToken};
pub use issuer::TokenIssuer;
pub use keys::{KeyMaterial, KeyRing};
pub use service::TokenService;
pub use validator::{TokenError, TokenValidator};
