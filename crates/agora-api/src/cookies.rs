//! Session cookie handling.
//!
//! Both cookies are `HttpOnly`, `SameSite=Lax`, path `/`, and `Secure`
//! unless disabled for local development. Max-ages follow the token
//! lifetimes; clearing writes an empty value with `Max-Age=0`.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use agora_auth::session::SessionCredentials;
use agora_auth::token::{TokenClass, TokenPair};

/// Name of the access token cookie.
pub const ACCESS_COOKIE: &str = "access_token";
/// Name of the refresh token cookie.
pub const REFRESH_COOKIE: &str = "refresh_token";

fn session_cookie(name: &'static str, value: String, max_age_seconds: i64, secure: bool) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(max_age_seconds))
        .build()
}

/// Read the session cookies from a jar.
pub fn credentials_from_jar(jar: &CookieJar) -> SessionCredentials {
    let value = |name: &str| {
        jar.get(name)
            .map(|c| c.value().to_string())
            .filter(|v| !v.is_empty())
    };
    SessionCredentials {
        access_token: value(ACCESS_COOKIE),
        refresh_token: value(REFRESH_COOKIE),
    }
}

/// Write both tokens of a pair.
pub fn set_session_cookies(jar: CookieJar, tokens: &TokenPair, secure: bool) -> CookieJar {
    jar.add(session_cookie(
        ACCESS_COOKIE,
        tokens.access_token.clone(),
        TokenClass::Access.ttl_seconds(),
        secure,
    ))
    .add(session_cookie(
        REFRESH_COOKIE,
        tokens.refresh_token.clone(),
        TokenClass::Refresh.ttl_seconds(),
        secure,
    ))
}

/// Overwrite both cookies with empty, immediately-expiring values.
pub fn clear_session_cookies(jar: CookieJar, secure: bool) -> CookieJar {
    jar.add(session_cookie(ACCESS_COOKIE, String::new(), 0, secure))
        .add(session_cookie(REFRESH_COOKIE, String::new(), 0, secure))
}
