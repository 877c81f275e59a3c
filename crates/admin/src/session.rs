//! Admin session cookie transport.
//!
//! Writes the signed session token into a hardened cookie and reads it back,
//! tolerant of the cookie names earlier deployments wrote. Aliases are
//! accepted on read only - the primary name is the only one ever written -
//! so sessions issued under an old name keep working until they expire.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;

/// Primary session cookie name for admin.
pub const SESSION_COOKIE_NAME: &str = "inkstone_admin_session";

/// Candidate cookie names checked in priority order when reading.
///
/// The primary name wins over any alias; among aliases, earlier entries win.
pub const COOKIE_CANDIDATES: &[&str] =
    &[SESSION_COOKIE_NAME, "admin_session", "studio_admin_token"];

/// Session expiry in seconds (24 hours). Expiry lives here, in the cookie,
/// not in the token.
const SESSION_MAX_AGE_SECONDS: i64 = 24 * 60 * 60;

/// Build the session cookie carrying `token`.
///
/// `secure` should be true whenever the gateway is served over HTTPS
/// (derived from the configured base URL).
#[must_use]
pub fn session_cookie(token: String, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE_NAME, token))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(Duration::seconds(SESSION_MAX_AGE_SECONDS))
        .build()
}

/// Build the cookie that revokes the session: same name, empty value,
/// `Max-Age=0`. With no server-side token registry, overwriting the cookie
/// is the only revocation there is.
#[must_use]
pub fn expired_cookie() -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE_NAME, ""))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(Duration::ZERO)
        .build()
}

/// Read the session token from the jar: the first present, non-empty value
/// over [`COOKIE_CANDIDATES`].
#[must_use]
pub fn read_token(jar: &CookieJar) -> Option<String> {
    read_token_from(jar, COOKIE_CANDIDATES)
}

fn read_token_from(jar: &CookieJar, candidates: &[&str]) -> Option<String> {
    candidates.iter().find_map(|name| {
        jar.get(name)
            .map(Cookie::value)
            .filter(|value| !value.is_empty())
            .map(str::to_owned)
    })
}
