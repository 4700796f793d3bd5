//! TikTok Login Kit integration: consent-screen redirect and the
//! authorization-code exchange.

pub mod client;
pub mod routes;
pub mod service;

/// TikTok consent screen.
pub const AUTHORIZE_URL: &str = "https://www.tiktok.com/auth/authorize/";
/// TikTok token endpoint (Login Kit v1, accepts a JSON body).
pub const TOKEN_URL: &str = "https://open-api.tiktok.com/oauth/access_token/";
/// Scope requested on the consent screen.
pub const LOGIN_SCOPE: &str = "user.info.basic";
/// CSRF cookie lifetime; an authorization attempt should finish well within it.
pub const CSRF_COOKIE_TTL_SECONDS: i64 = 300;
