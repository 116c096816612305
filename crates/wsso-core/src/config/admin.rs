//! Directory administration credential.

use serde::{Deserialize, Serialize};

/// Static HTTP Basic credential gating the directory administration routes.
///
/// This is a separate trust boundary from the session/token path.
#[derive(Clone, Serialize, Deserialize)]
pub struct AdminConfig {
    /// Expected Basic-auth username.
    #[serde(default = "default_username")]
    pub username: String,
    /// Expected Basic-auth password.
    pub password: String,
}

impl std::fmt::Debug for AdminConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminConfig")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

fn default_username() -> String {
    "admin".to_string()
}
