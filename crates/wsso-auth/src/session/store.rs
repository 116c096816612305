//! Session key/value storage backed by a signed cookie.

use std::collections::BTreeMap;
use std::sync::Arc;

use wsso_core::result::AppResult;

use super::codec::SessionCodec;

/// Per-request key/value session storage.
///
/// Mutations are buffered until [`SessionStore::save`] is called.
pub trait SessionStore: Send {
    /// Reads a value.
    fn get(&self, key: &str) -> Option<&str>;

    /// Writes a value.
    fn set(&mut self, key: &str, value: String);

    /// Removes a value, returning whether it was present.
    fn delete(&mut self, key: &str) -> bool;

    /// Persists buffered mutations.
    fn save(&mut self) -> AppResult<()>;
}

/// Cookie mutation produced by a successful save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionWrite {
    /// Send the cookie with this encoded value.
    Set(String),
    /// Expire the cookie.
    Clear,
}

/// Session whose entire state lives in the client's cookie.
#[derive(Debug)]
pub struct CookieSession {
    codec: Arc<SessionCodec>,
    values: BTreeMap<String, String>,
    dirty: bool,
    pending: Option<SessionWrite>,
}

impl CookieSession {
    /// Restores a session from the incoming cookie value.
    ///
    /// A missing or invalid cookie yields an empty session.
    pub fn load(codec: Arc<SessionCodec>, cookie: Option<&str>) -> Self {
        let values = cookie
            .and_then(|value| codec.decode(value))
            .unwrap_or_default();
        Self {
            codec,
            values,
            dirty: false,
            pending: None,
        }
    }

    /// Creates an empty session.
    pub fn empty(codec: Arc<SessionCodec>) -> Self {
        Self::load(codec, None)
    }

    /// Whether the session holds no values.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Takes the cookie mutation produced by the last save, if any.
    pub fn take_write(&mut self) -> Option<SessionWrite> {
        self.pending.take()
    }
}

impl SessionStore for CookieSession {
    fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    fn set(&mut self, key: &str, value: String) {
        self.values.insert(key.to_string(), value);
        self.dirty = true;
    }

    fn delete(&mut self, key: &str) -> bool {
        let removed = self.values.remove(key).is_some();
        self.dirty |= removed;
        removed
    }

    fn save(&mut self) -> AppResult<()> {
        if !self.dirty {
            return Ok(());
        }
        let write = if self.values.is_empty() {
            SessionWrite::Clear
        } else {
            SessionWrite::Set(self.codec.encode(&self.values)?)
        };
        self.pending = Some(write);
        self.dirty = false;
        Ok(())
    }
}
