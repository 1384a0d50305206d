//! The HTTP-only session cookie carrying the signed token.
//!
//! `Secure` + `SameSite=None` because the SPA is served from a different
//! origin than the API and sends credentials cross-site.

use axum_extra::extract::cookie::{Cookie, SameSite};

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "token";

/// Build the session cookie for a freshly issued token.
pub fn session_cookie(token: String, max_age_hours: i64) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .secure(true)
        .same_site(SameSite::None)
        .max_age(time::Duration::hours(max_age_hours))
        .build()
}

/// Build a removal cookie matching [`session_cookie`]'s path, for logout and
/// credential-clearing 401 responses.
pub fn removal_cookie() -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, ""))
        .path("/")
        .http_only(true)
        .secure(true)
        .same_site(SameSite::None)
        .build()
}
