use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use axum_extra::extract::cookie::Key;
use http_body_util::BodyExt;
use serde::Deserialize;
use tower::ServiceExt;

use tlp_api::{
    auth::tiktok::client::{ExchangeError, ProviderResponse, TokenExchanger, TokenRequest},
    config::{Environment, ResponseMode},
    middleware::cors::create_cors_layer,
    router,
    state::{ApiState, ClientCredentials},
};

pub const TEST_COOKIE_SECRET: &str =
    "test_cookie_secret_minimum_64_characters_long_for_secure_encryption";
pub const TEST_CLIENT_SECRET: &str = "test_client_secret";

/// Scripted reply for the mock exchanger
#[derive(Clone, Debug)]
pub enum MockReply {
    Response {
        status: u16,
        body: serde_json::Value,
    },
    Timeout,
    Unreachable,
}

/// Test double for the one outbound call the proxy makes. Records every
/// request so tests can assert on call count and body.
pub struct MockExchanger {
    reply: MockReply,
    calls: Mutex<Vec<TokenRequest>>,
}

impl MockExchanger {
    pub fn new(reply: MockReply) -> Self {
        Self {
            reply,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().expect("calls lock").len()
    }

    pub fn last_request(&self) -> Option<TokenRequest> {
        self.calls.lock().expect("calls lock").last().cloned()
    }
}

#[async_trait]
impl TokenExchanger for MockExchanger {
    async fn exchange(
        &self,
        _token_url: &str,
        request: &TokenRequest,
    ) -> Result<ProviderResponse, ExchangeError> {
        self.calls.lock().expect("calls lock").push(request.clone());

        match &self.reply {
            MockReply::Response { status, body } => Ok(ProviderResponse {
                status: *status,
                body: body.clone(),
            }),
            MockReply::Timeout => Err(ExchangeError::Timeout),
            MockReply::Unreachable => Err(ExchangeError::Transport("connection refused".to_owned())),
        }
    }
}

/// Test state builder for creating an ApiState around the mock exchanger
pub struct TestStateBuilder {
    reply: MockReply,
    response_mode: ResponseMode,
    with_credentials: bool,
    with_frontend_url: bool,
}

impl TestStateBuilder {
    pub fn new() -> Self {
        Self {
            reply: MockReply::Response {
                status: 200,
                body: serde_json::json!({}),
            },
            response_mode: ResponseMode::Json,
            with_credentials: true,
            with_frontend_url: true,
        }
    }

    pub fn provider_reply(mut self, status: u16, body: serde_json::Value) -> Self {
        self.reply = MockReply::Response { status, body };
        self
    }

    pub fn provider_timeout(mut self) -> Self {
        self.reply = MockReply::Timeout;
        self
    }

    pub fn provider_unreachable(mut self) -> Self {
        self.reply = MockReply::Unreachable;
        self
    }

    pub fn response_mode(mut self, mode: ResponseMode) -> Self {
        self.response_mode = mode;
        self
    }

    /// Simulate missing TIKTOK_CLIENT_KEY / TIKTOK_CLIENT_SECRET / REDIRECT_URI.
    pub fn without_credentials(mut self) -> Self {
        self.with_credentials = false;
        self
    }

    /// Simulate an unset FRONTEND_URL.
    pub fn without_frontend_url(mut self) -> Self {
        self.with_frontend_url = false;
        self
    }

    pub fn build(self) -> (ApiState, Arc<MockExchanger>) {
        let exchanger = Arc::new(MockExchanger::new(self.reply));

        let credentials = self.with_credentials.then(|| ClientCredentials {
            client_key: "test_client_key".to_owned(),
            client_secret: TEST_CLIENT_SECRET.to_owned(),
            redirect_uri: "http://localhost:3000/auth/callback".to_owned(),
        });

        let state = ApiState {
            exchanger: exchanger.clone(),
            credentials,
            authorize_url: "https://www.tiktok.com/auth/authorize/".to_owned(),
            token_url: "https://open-api.tiktok.com/oauth/access_token/".to_owned(),
            frontend_url: self
                .with_frontend_url
                .then(|| "http://localhost:8080".to_owned()),
            response_mode: self.response_mode,
            csrf_cookie_ttl_seconds: 300,
            cookie_key: Key::from(TEST_COOKIE_SECRET.as_bytes()),
            environment: Environment::Development,
        };

        (state, exchanger)
    }
}

impl Default for TestStateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Full app as the binaries assemble it: router plus a permissive CORS layer
/// and request-ID propagation.
pub fn app(state: ApiState) -> Router {
    router::router()
        .with_state(state)
        .layer(create_cors_layer(vec![]))
        .layer(axum::middleware::from_fn(
            tlp_api::middleware::request_id::request_id_middleware,
        ))
}

/// Helper to make requests to the test app
pub struct TestClient {
    router: Router,
}

impl TestClient {
    pub fn new(router: Router) -> Self {
        Self { router }
    }

    /// Send a request and get the response
    pub async fn request(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to execute request");

        let status = response.status();
        let headers = response.headers().clone();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read response body")
            .to_bytes();

        TestResponse {
            status,
            body: body_bytes.to_vec(),
            headers,
        }
    }

    /// Send a GET request
    pub async fn get(&self, uri: &str) -> TestResponse {
        let request = Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .expect("Failed to build request");

        self.request(request).await
    }

    /// Send a POST request with no body
    pub async fn post(&self, uri: &str) -> TestResponse {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .body(Body::empty())
            .expect("Failed to build request");

        self.request(request).await
    }

    /// Send a browser-style CORS preflight request
    pub async fn preflight(&self, uri: &str) -> TestResponse {
        let request = Request::builder()
            .method("OPTIONS")
            .uri(uri)
            .header("origin", "http://localhost:8080")
            .header("access-control-request-method", "GET")
            .body(Body::empty())
            .expect("Failed to build request");

        self.request(request).await
    }

    /// Send a bare OPTIONS request without preflight headers
    pub async fn options(&self, uri: &str) -> TestResponse {
        let request = Request::builder()
            .method("OPTIONS")
            .uri(uri)
            .body(Body::empty())
            .expect("Failed to build request");

        self.request(request).await
    }

    /// Send a GET request carrying an encrypted CSRF state cookie
    pub async fn get_with_csrf_cookie(
        &self,
        uri: &str,
        token: &str,
        cookie_key: &Key,
    ) -> TestResponse {
        use cookie::{CookieJar as RawCookieJar, Key as RawKey};

        let raw_key = RawKey::try_from(cookie_key.master()).expect("Invalid key");
        let mut raw_jar = RawCookieJar::new();
        let raw_cookie = cookie::Cookie::new("csrf_state", token.to_string());
        raw_jar.private_mut(&raw_key).add(raw_cookie);

        let encrypted = raw_jar.get("csrf_state").expect("Cookie should exist");

        let request = Request::builder()
            .method("GET")
            .uri(uri)
            .header(
                "cookie",
                format!("{}={}", encrypted.name(), encrypted.value()),
            )
            .body(Body::empty())
            .expect("Failed to build request");

        self.request(request).await
    }
}

/// Test response wrapper
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
    pub headers: axum::http::HeaderMap,
}

impl TestResponse {
    /// Get response body as string
    pub fn text(&self) -> String {
        String::from_utf8(self.body.clone()).expect("Response body is not valid UTF-8")
    }

    /// Parse response body as JSON
    pub fn json<T: for<'de> Deserialize<'de>>(&self) -> T {
        serde_json::from_slice(&self.body).expect("Failed to parse JSON response")
    }

    /// Assert status code
    pub fn assert_status(&self, expected: StatusCode) {
        assert_eq!(
            self.status,
            expected,
            "Expected status {}, got {}. Body: {}",
            expected,
            self.status,
            self.text()
        );
    }

    /// Get a response header as a string
    pub fn header(&self, name: &str) -> Option<String> {
        self.headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(String::from)
    }

    /// Find the raw Set-Cookie header for a cookie by name
    pub fn set_cookie(&self, name: &str) -> Option<String> {
        for value in self.headers.get_all("set-cookie").iter() {
            if let Ok(cookie_str) = value.to_str() {
                if cookie_str.starts_with(&format!("{}=", name)) {
                    return Some(cookie_str.to_string());
                }
            }
        }
        None
    }
}

/// Decrypt the CSRF cookie set by the initiator so tests can compare it with
/// the `state` query parameter in the redirect.
pub fn decrypt_csrf_cookie(set_cookie: &str, cookie_key: &Key) -> Option<String> {
    use cookie::{CookieJar as RawCookieJar, Key as RawKey};

    // Set-Cookie values are percent-encoded (the base64 padding in particular),
    // so the plain parser would hand back a value the jar cannot decrypt.
    let pair = set_cookie.split(';').next()?.to_owned();
    let raw = cookie::Cookie::parse_encoded(pair).ok()?;

    let raw_key = RawKey::try_from(cookie_key.master()).ok()?;
    let mut raw_jar = RawCookieJar::new();
    raw_jar.add_original(raw);

    raw_jar
        .private(&raw_key)
        .get("csrf_state")
        .map(|c| c.value().to_owned())
}
