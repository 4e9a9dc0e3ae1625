//! Cookie builders for the token pair
//!
//! Both tokens travel as http-only, SameSite=Strict, root-path cookies whose
//! max-age matches the token's own expiry. The Secure attribute follows the
//! deployment environment.

use axum_extra::extract::cookie::{Cookie, SameSite};
use time::Duration;

/// Cookie name for the access token
pub const ACCESS_COOKIE: &str = "access_token";
/// Cookie name for the refresh token
pub const REFRESH_COOKIE: &str = "refresh_token";

fn token_cookie(name: &str, value: String, max_age: Duration, secure: bool) -> Cookie<'static> {
    Cookie::build((name.to_string(), value))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Strict)
        .path("/".to_string())
        .max_age(max_age)
        .build()
}

/// Build the access token cookie
pub fn access_cookie(token: &str, max_age_secs: i64, secure: bool) -> Cookie<'static> {
    token_cookie(
        ACCESS_COOKIE,
        token.to_string(),
        Duration::seconds(max_age_secs),
        secure,
    )
}

/// Build the refresh token cookie
pub fn refresh_cookie(token: &str, max_age_secs: i64, secure: bool) -> Cookie<'static> {
    token_cookie(
        REFRESH_COOKIE,
        token.to_string(),
        Duration::seconds(max_age_secs),
        secure,
    )
}

/// Build an expired cookie clearing the access token
pub fn clear_access_cookie(secure: bool) -> Cookie<'static> {
    token_cookie(ACCESS_COOKIE, String::new(), Duration::ZERO, secure)
}

/// Build an expired cookie clearing the refresh token
pub fn clear_refresh_cookie(secure: bool) -> Cookie<'static> {
    token_cookie(REFRESH_COOKIE, String::new(), Duration::ZERO, secure)
}
