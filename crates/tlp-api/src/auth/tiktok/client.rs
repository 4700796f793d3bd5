use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::state::ClientCredentials;

/// Single attempt, no retry. The provider either answers within this window or
/// the invocation fails fast with a service-unavailable outcome.
pub const DEFAULT_EXCHANGE_TIMEOUT: Duration = Duration::from_secs(10);

/// Body of the authorization-code exchange POST.
#[derive(Clone, Debug, Serialize)]
pub struct TokenRequest {
    pub client_key: String,
    pub client_secret: String,
    pub code: String,
    pub grant_type: String,
    pub redirect_uri: String,
}

impl TokenRequest {
    pub fn authorization_code(credentials: &ClientCredentials, code: String) -> Self {
        Self {
            client_key: credentials.client_key.clone(),
            client_secret: credentials.client_secret.clone(),
            code,
            grant_type: "authorization_code".to_owned(),
            redirect_uri: credentials.redirect_uri.clone(),
        }
    }
}

/// Raw provider reply. Transport succeeded; the payload may still describe an
/// error, classification happens in [`super::service`].
#[derive(Clone, Debug)]
pub struct ProviderResponse {
    pub status: u16,
    pub body: Value,
}

/// The request never produced a response.
#[derive(Debug, Error)]
pub enum ExchangeError {
    #[error("provider did not respond within the timeout")]
    Timeout,
    #[error("transport failure: {0}")]
    Transport(String),
}

/// Outbound token-exchange capability.
///
/// Injected into [`crate::ApiState`] so the test suite can substitute a double
/// for the one network call the proxy makes.
#[async_trait]
pub trait TokenExchanger: Send + Sync {
    async fn exchange(
        &self,
        token_url: &str,
        request: &TokenRequest,
    ) -> Result<ProviderResponse, ExchangeError>;
}

/// Production exchanger backed by `reqwest`.
#[derive(Clone, Debug)]
pub struct HttpTokenExchanger {
    http: reqwest::Client,
}

impl HttpTokenExchanger {
    pub fn new(timeout: Duration) -> reqwest::Result<Self> {
        Ok(Self {
            http: reqwest::Client::builder().timeout(timeout).build()?,
        })
    }
}

#[async_trait]
impl TokenExchanger for HttpTokenExchanger {
    async fn exchange(
        &self,
        token_url: &str,
        request: &TokenRequest,
    ) -> Result<ProviderResponse, ExchangeError> {
        // TikTok accepts both JSON and form-urlencoded; JSON keeps the body
        // readable in provider-side request logs.
        let response = self
            .http
            .post(token_url)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ExchangeError::Timeout
                } else {
                    ExchangeError::Transport(e.to_string())
                }
            })?;

        let status = response.status().as_u16();
        // A non-JSON body still counts as a response, classification will
        // fall back to a generic description.
        let body = response.json::<Value>().await.unwrap_or(Value::Null);

        Ok(ProviderResponse { status, body })
    }
}
