//! Cookie-backed session storage and the login/logout lifecycle.

pub mod codec;
pub mod manager;
pub mod store;

pub use codec::{MAX_COOKIE_BYTES, SessionCodec};
pub use manager::{IDENTITY_KEY, LogoutOutcome, SessionManager};
pub use store::{CookieSession, SessionStore, SessionWrite};
