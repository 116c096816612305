//! Session cookie configuration.

use serde::{Deserialize, Serialize};

/// Minimum accepted length of the session signing secret, in bytes.
pub const MIN_SECRET_LEN: usize = 32;

/// Cookie-backed session store configuration.
///
/// Sessions carry no server-side expiry; the cookie `Max-Age` is the only
/// lifetime bound.
#[derive(Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Session cookie name.
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
    /// HMAC secret used to sign the session cookie.
    pub secret: String,
    /// Cookie `Max-Age` in seconds.
    #[serde(default = "default_max_age")]
    pub max_age_seconds: i64,
    /// Cookie `Path`.
    #[serde(default = "default_path")]
    pub path: String,
    /// Whether the cookie is restricted to HTTPS.
    #[serde(default)]
    pub secure: bool,
}

impl std::fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionConfig")
            .field("cookie_name", &self.cookie_name)
            .field("secret", &"***")
            .field("max_age_seconds", &self.max_age_seconds)
            .field("path", &self.path)
            .field("secure", &self.secure)
            .finish()
    }
}

fn default_cookie_name() -> String {
    "wsso_session".to_string()
}

fn default_max_age() -> i64 {
    86_400
}

fn default_path() -> String {
    "/".to_string()
}
