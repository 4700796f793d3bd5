use axum_extra::extract::cookie::{Cookie, SameSite};

use crate::config::Environment;

/// Name of the cookie carrying the CSRF state token between the authorization
/// redirect and the callback.
pub const CSRF_COOKIE: &str = "csrf_state";

/// Create the short-lived CSRF state cookie.
///
/// HTTP-only and SameSite=Strict always; Secure everywhere except development
/// so the flow can be exercised over plain HTTP locally. The cookie expires
/// with the authorization attempt, it never outlives the flow.
pub fn create_csrf_cookie(
    token: String,
    environment: &Environment,
    max_age_seconds: i64,
) -> Cookie<'static> {
    let is_development = environment.is_development();

    Cookie::build((CSRF_COOKIE, token))
        .path("/")
        .max_age(time::Duration::seconds(max_age_seconds))
        .http_only(true)
        .same_site(SameSite::Strict)
        .secure(!is_development)
        .build()
}
