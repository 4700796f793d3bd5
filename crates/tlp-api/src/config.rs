use std::env;

/// Deployment environment, controls cookie hardening and log format.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    fn parse(value: Option<String>) -> Self {
        match value.as_deref() {
            Some("production") => Self::Production,
            _ => Self::Development,
        }
    }
}

/// How the callback answers a successful token exchange.
///
/// The two strategies are alternatives, never combined: either the raw provider
/// payload comes back as JSON (with the request's `state` attached so the
/// frontend can re-verify it), or the caller is redirected to the frontend
/// origin with the token fields as query parameters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ResponseMode {
    #[default]
    Json,
    Redirect,
}

impl ResponseMode {
    fn parse(value: Option<String>) -> Self {
        match value.as_deref() {
            Some("redirect") => Self::Redirect,
            _ => Self::Json,
        }
    }
}

#[derive(Clone, Debug)]
pub struct ApiConfig {
    /// TikTok app credentials. Optional at load time: their absence is reported
    /// per-invocation as a generic server configuration error, never leaked to
    /// the caller.
    pub client_key: Option<String>,
    pub client_secret: Option<String>,
    pub redirect_uri: Option<String>,
    /// Frontend origin for the redirect response mode; JSON mode never needs
    /// it, so absence only fails redirect-mode invocations.
    pub frontend_url: Option<String>,
    /// Comma-separated CORS allow-list; `*` or unset means permissive.
    pub allowed_origin: Option<String>,
    /// Key material for the private CSRF cookie jar, at least 64 bytes.
    pub cookie_secret: String,
    pub response_mode: ResponseMode,
    pub env: Environment,
    /// Provider endpoint overrides, mainly for staging and tests.
    pub token_url: Option<String>,
    pub authorize_url: Option<String>,
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, env::VarError> {
        Ok(Self {
            client_key: env::var("TIKTOK_CLIENT_KEY").ok(),
            client_secret: env::var("TIKTOK_CLIENT_SECRET").ok(),
            redirect_uri: env::var("REDIRECT_URI").ok(),
            frontend_url: env::var("FRONTEND_URL").ok(),
            allowed_origin: env::var("ALLOWED_ORIGIN").ok(),
            cookie_secret: env::var("COOKIE_SECRET")?,
            response_mode: ResponseMode::parse(env::var("RESPONSE_MODE").ok()),
            env: Environment::parse(env::var("ENVIRONMENT").ok()),
            token_url: env::var("TIKTOK_TOKEN_URL").ok(),
            authorize_url: env::var("TIKTOK_AUTHORIZE_URL").ok(),
        })
    }

    /// Load configuration from Shuttle secrets instead of process environment.
    #[cfg(feature = "shuttle")]
    pub fn from_shuttle_secrets(secrets: &shuttle_runtime::SecretStore) -> anyhow::Result<Self> {
        Ok(Self {
            client_key: secrets.get("TIKTOK_CLIENT_KEY"),
            client_secret: secrets.get("TIKTOK_CLIENT_SECRET"),
            redirect_uri: secrets.get("REDIRECT_URI"),
            frontend_url: secrets.get("FRONTEND_URL"),
            allowed_origin: secrets.get("ALLOWED_ORIGIN"),
            cookie_secret: secrets
                .get("COOKIE_SECRET")
                .ok_or_else(|| anyhow::anyhow!("COOKIE_SECRET secret is not set"))?,
            response_mode: ResponseMode::parse(secrets.get("RESPONSE_MODE")),
            env: Environment::parse(secrets.get("ENVIRONMENT")),
            token_url: secrets.get("TIKTOK_TOKEN_URL"),
            authorize_url: secrets.get("TIKTOK_AUTHORIZE_URL"),
        })
    }

    /// Split the configured allow-origin value into individual origins.
    pub fn parsed_allowed_origins(&self) -> Vec<String> {
        self.allowed_origin
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_owned)
            .collect()
    }
}
