//! Data transfer objects for API request and response bodies.

pub mod request;
pub mod response;

pub use request::{LoginRequest, RegisterRequest, ValidatedJson};
pub use response::{HealthResponse, IdentityResponse, LinkResponse, MessageResponse, UsersResponse};
