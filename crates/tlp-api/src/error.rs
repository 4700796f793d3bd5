use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Error taxonomy for the proxy.
///
/// Client input problems and CSRF failures map to 400, configuration gaps to a
/// generic 500 (detail is logged server-side, never echoed), provider errors
/// mirror the provider's status, and an unreachable provider maps to 503.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("missing authorization code")]
    MissingCode,
    #[error("missing state parameter")]
    MissingState,
    #[error("state parameter does not match the issued CSRF token")]
    CsrfMismatch,
    #[error("server configuration error: {0}")]
    Config(String),
    #[error("provider error {status}: {code}")]
    Upstream {
        status: StatusCode,
        code: String,
        description: String,
    },
    #[error("provider unreachable")]
    Unavailable,
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn missing_credentials() -> Self {
        Self::Config(
            "TIKTOK_CLIENT_KEY, TIKTOK_CLIENT_SECRET, or REDIRECT_URI is not set".to_owned(),
        )
    }
}

impl ApiError {
    /// Status, wire code, and caller-facing description for this error.
    ///
    /// Logging of server-side detail happens here so both response shapes
    /// (JSON body and frontend redirect) report consistently.
    pub fn into_parts(self) -> (StatusCode, String, String) {
        match self {
            Self::MissingCode => (
                StatusCode::BAD_REQUEST,
                "missing_code".to_owned(),
                "Missing authorization code".to_owned(),
            ),
            Self::MissingState => (
                StatusCode::BAD_REQUEST,
                "missing_state".to_owned(),
                "Missing state parameter - CSRF protection failed".to_owned(),
            ),
            Self::CsrfMismatch => (
                StatusCode::BAD_REQUEST,
                "csrf_mismatch".to_owned(),
                "State parameter does not match the value issued for this login attempt"
                    .to_owned(),
            ),
            Self::Config(detail) => {
                tracing::error!(%detail, "request rejected due to server misconfiguration");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "server_configuration_error".to_owned(),
                    "Server configuration error".to_owned(),
                )
            }
            Self::Upstream {
                status,
                code,
                description,
            } => (status, code, description),
            Self::Unavailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                "service_unavailable".to_owned(),
                "TikTok API is not responding".to_owned(),
            ),
            Self::Internal(detail) => {
                tracing::error!(%detail, "unexpected internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error".to_owned(),
                    "An unexpected error occurred".to_owned(),
                )
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, description) = self.into_parts();

        (
            status,
            Json(json!({ "error": code, "error_description": description })),
        )
            .into_response()
    }
}
