use std::sync::Arc;

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;

use crate::auth::tiktok::{
    self,
    client::{DEFAULT_EXCHANGE_TIMEOUT, HttpTokenExchanger, TokenExchanger},
};
use crate::config::{ApiConfig, Environment, ResponseMode};

/// TikTok app credentials required for the code exchange.
#[derive(Clone, Debug)]
pub struct ClientCredentials {
    pub client_key: String,
    pub client_secret: String,
    pub redirect_uri: String,
}

/// Per-invocation handler state.
///
/// There is no database and no shared mutable state: everything here is
/// read-only configuration plus the outbound exchange capability, so the
/// handlers stay pure functions from (request, state) to response.
#[derive(Clone)]
pub struct ApiState {
    /// Outbound token-exchange capability, swapped for a double in tests.
    pub exchanger: Arc<dyn TokenExchanger>,
    /// `None` when any of the three credential values is missing; the callback
    /// then fails with a generic configuration error.
    pub credentials: Option<ClientCredentials>,
    pub authorize_url: String,
    pub token_url: String,
    /// Only required in redirect response mode; checked per invocation.
    pub frontend_url: Option<String>,
    pub response_mode: ResponseMode,
    /// Lifetime of the CSRF state cookie, in seconds.
    pub csrf_cookie_ttl_seconds: i64,
    pub cookie_key: Key,
    pub environment: Environment,
}

impl ApiState {
    pub fn new(config: ApiConfig) -> anyhow::Result<Self> {
        if config.cookie_secret.len() < 64 {
            anyhow::bail!("COOKIE_SECRET must be at least 64 bytes");
        }
        let cookie_key = Key::from(config.cookie_secret.as_bytes());

        let credentials = match (config.client_key, config.client_secret, config.redirect_uri) {
            (Some(client_key), Some(client_secret), Some(redirect_uri)) => {
                Some(ClientCredentials {
                    client_key,
                    client_secret,
                    redirect_uri,
                })
            }
            _ => {
                tracing::warn!(
                    "TikTok client credentials incomplete, callback requests will be rejected"
                );
                None
            }
        };

        let exchanger = HttpTokenExchanger::new(DEFAULT_EXCHANGE_TIMEOUT)?;

        Ok(Self {
            exchanger: Arc::new(exchanger),
            credentials,
            authorize_url: config
                .authorize_url
                .unwrap_or_else(|| tiktok::AUTHORIZE_URL.to_owned()),
            token_url: config
                .token_url
                .unwrap_or_else(|| tiktok::TOKEN_URL.to_owned()),
            frontend_url: config.frontend_url,
            response_mode: config.response_mode,
            csrf_cookie_ttl_seconds: tiktok::CSRF_COOKIE_TTL_SECONDS,
            cookie_key,
            environment: config.env,
        })
    }
}

impl FromRef<ApiState> for Key {
    fn from_ref(state: &ApiState) -> Self {
        state.cookie_key.clone()
    }
}
