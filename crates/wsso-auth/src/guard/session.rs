//! Admits requests carrying an authenticated session.

use async_trait::async_trait;

use super::{CapabilityBackend, GuardRejection, GuardRequest, Principal};

/// Grants `SessionActive` when the session names an identity.
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionBackend;

#[async_trait]
impl CapabilityBackend for SessionBackend {
    fn name(&self) -> &'static str {
        "session"
    }

    async fn authorize(&self, request: &GuardRequest) -> Result<Principal, GuardRejection> {
        match request.session_identity.as_deref() {
            Some(username) if !username.is_empty() => Ok(Principal::SessionActive {
                username: username.to_string(),
            }),
            _ => Err(GuardRejection::MissingSession),
        }
    }
}
