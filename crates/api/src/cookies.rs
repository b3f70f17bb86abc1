//! Session cookie handling.
//!
//! One cookie per authentication scheme, each carrying a signed opaque
//! value. Cookies are `HttpOnly` and `Secure`; a "remember me" login gets a
//! long max-age, other logins stay session-scoped.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use graduon_core::AuthScheme;

/// Add a scheme's session cookie to the jar.
///
/// `max_age_days == None` issues a session-scoped cookie (dropped when the
/// browser closes).
#[must_use]
pub fn issue_session_cookie(
    jar: CookieJar,
    scheme: AuthScheme,
    token: String,
    max_age_days: Option<u32>,
) -> CookieJar {
    let mut cookie = Cookie::new(scheme.cookie_name(), token);
    cookie.set_http_only(true);
    cookie.set_secure(true);
    cookie.set_same_site(SameSite::Lax);
    cookie.set_path("/");
    if let Some(days) = max_age_days {
        cookie.set_max_age(time::Duration::days(i64::from(days)));
    }
    jar.add(cookie)
}

/// Clear every scheme's session cookie.
///
/// The client does not know which scheme authenticated it, so logout
/// re-issues all four cookies empty with a zero max-age.
#[must_use]
pub fn clear_all_session_cookies(mut jar: CookieJar) -> CookieJar {
    for scheme in AuthScheme::PRIORITY {
        let mut cookie = Cookie::new(scheme.cookie_name(), "");
        cookie.set_http_only(true);
        cookie.set_secure(true);
        cookie.set_same_site(SameSite::Lax);
        cookie.set_path("/");
        cookie.set_max_age(time::Duration::ZERO);
        jar = jar.add(cookie);
    }
    jar
}
