use axum::http::{Method, header};
use tower_http::cors::{AllowOrigin, CorsLayer};

/// Creates the CORS layer for the proxy.
///
/// An empty list or a `*` entry means any origin may read the responses (the
/// proxy never relies on cookies being readable cross-origin, the CSRF cookie
/// is same-site). A non-empty list restricts reads to those origins and allows
/// credentials.
pub fn create_cors_layer(allowed_origins: Vec<String>) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    if allowed_origins.is_empty() || allowed_origins.iter().any(|o| o == "*") {
        return layer.allow_origin(AllowOrigin::any());
    }

    let origins = allowed_origins
        .into_iter()
        .filter_map(|s| s.parse::<axum::http::HeaderValue>().ok())
        .collect::<Vec<_>>();

    layer
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
}
