use axum::{
    Router,
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
};

use crate::{auth, state::ApiState};

pub fn router() -> Router<ApiState> {
    Router::new()
        .route("/health", get(health).options(preflight))
        .merge(auth::routes())
        .fallback(fallback_handler)
}

async fn health() -> StatusCode {
    StatusCode::OK
}

/// Answer a bare cross-origin preflight with an empty 200. The CORS layer in
/// the binaries fills in the allow-* headers.
pub(crate) async fn preflight() -> StatusCode {
    StatusCode::OK
}

/// OPTIONS succeeds on any path; everything else unknown is a 404.
async fn fallback_handler(method: Method) -> Response {
    if method == Method::OPTIONS {
        StatusCode::OK.into_response()
    } else {
        (
            StatusCode::NOT_FOUND,
            "The requested resource was not found",
        )
            .into_response()
    }
}
