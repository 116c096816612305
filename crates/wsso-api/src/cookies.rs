//! Session and token cookie construction.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use wsso_auth::session::SessionWrite;
use wsso_core::config::{AppConfig, SessionConfig, TokenCookieConfig};

/// Cookie carrying a signed claims token.
pub fn token_cookie(token: String, config: &TokenCookieConfig) -> Cookie<'static> {
    let mut builder = Cookie::build((config.name.clone(), token))
        .path(config.path.clone())
        .http_only(true)
        .secure(config.secure)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(config.max_age_seconds));
    if let Some(domain) = &config.domain {
        builder = builder.domain(domain.clone());
    }
    builder.build()
}

/// Cookie carrying the encoded session.
pub fn session_cookie(value: String, config: &SessionConfig) -> Cookie<'static> {
    Cookie::build((config.cookie_name.clone(), value))
        .path(config.path.clone())
        .http_only(true)
        .secure(config.secure)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(config.max_age_seconds))
        .build()
}

/// Adds the cookie change produced by a session save.
pub fn apply_session_write(
    jar: CookieJar,
    write: Option<SessionWrite>,
    config: &SessionConfig,
) -> CookieJar {
    match write {
        Some(SessionWrite::Set(value)) => jar.add(session_cookie(value, config)),
        Some(SessionWrite::Clear) => jar.add(expired(session_cookie(String::new(), config))),
        None => jar,
    }
}

/// Expires both the session and token cookies.
///
/// The clearing cookies are always sent, whether or not the request
/// carried the originals.
pub fn clear_all(jar: CookieJar, config: &AppConfig) -> CookieJar {
    jar.add(expired(token_cookie(String::new(), &config.auth.token_cookie)))
        .add(expired(session_cookie(String::new(), &config.session)))
}

fn expired(mut cookie: Cookie<'static>) -> Cookie<'static> {
    cookie.make_removal();
    cookie
}
