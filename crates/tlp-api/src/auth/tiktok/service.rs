//! Response mapping for the token exchange: a linear classify step, no state
//! machine.

use axum::http::StatusCode;
use serde_json::Value;
use url::Url;

use super::client::{ExchangeError, ProviderResponse};
use crate::error::ApiError;

/// Classify the provider's reply into a token payload or an error.
///
/// TikTok sometimes embeds `error`/`error_description` in an HTTP 200 body;
/// that is a failed exchange and must not be passed through as success. Non-2xx
/// replies keep the provider's status and surface its description when one is
/// present.
pub fn classify_response(response: ProviderResponse) -> Result<Value, ApiError> {
    let ProviderResponse { status, body } = response;

    let error_code = body.get("error").and_then(Value::as_str).map(str::to_owned);
    let error_description = body
        .get("error_description")
        .and_then(Value::as_str)
        .map(str::to_owned);

    if (200..300).contains(&status) {
        if error_code.is_some() || error_description.is_some() {
            tracing::warn!(
                error = error_code.as_deref().unwrap_or("unknown"),
                "provider reported an exchange failure inside a 2xx response"
            );
            return Err(ApiError::Upstream {
                status: StatusCode::BAD_REQUEST,
                code: error_code.unwrap_or_else(|| "token_exchange_failed".to_owned()),
                description: error_description
                    .unwrap_or_else(|| "Failed to exchange authorization code".to_owned()),
            });
        }
        if !body.is_object() {
            tracing::warn!(status, "provider returned a 2xx response without a JSON object body");
            return Err(ApiError::Upstream {
                status: StatusCode::BAD_GATEWAY,
                code: "tiktok_api_error".to_owned(),
                description: "TikTok API returned an unusable response".to_owned(),
            });
        }
        return Ok(body);
    }

    let status_code = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
    let description = error_description
        .or_else(|| body.get("message").and_then(Value::as_str).map(str::to_owned))
        .unwrap_or_else(|| "TikTok API request failed".to_owned());

    tracing::warn!(status, "provider rejected the token exchange");
    Err(ApiError::Upstream {
        status: status_code,
        code: error_code.unwrap_or_else(|| "tiktok_api_error".to_owned()),
        description,
    })
}

/// Map a transport-level failure. Either way no response was received, so both
/// cases fail fast as service-unavailable.
pub fn map_exchange_error(err: ExchangeError) -> ApiError {
    match err {
        ExchangeError::Timeout => {
            tracing::warn!("token exchange timed out");
            ApiError::Unavailable
        }
        ExchangeError::Transport(detail) => {
            tracing::error!(%detail, "token exchange transport failure");
            ApiError::Unavailable
        }
    }
}

/// JSON response strategy: the raw provider payload, untouched, plus the
/// request's `state` so the frontend can re-verify it.
pub fn json_success(mut payload: Value, state: String) -> Result<Value, ApiError> {
    match payload.as_object_mut() {
        Some(map) => {
            map.insert("state".to_owned(), Value::String(state));
            Ok(payload)
        }
        None => Err(ApiError::Internal(
            "provider returned a non-object token payload".to_owned(),
        )),
    }
}

/// Redirect response strategy: send the caller back to the frontend origin with
/// the token fields and `state` as query parameters.
pub fn redirect_url(
    frontend_url: Option<&str>,
    payload: &Value,
    state: &str,
) -> Result<String, ApiError> {
    let frontend_url = frontend_url.ok_or_else(|| {
        ApiError::Config("FRONTEND_URL is not set but RESPONSE_MODE is redirect".to_owned())
    })?;
    let mut url = Url::parse(frontend_url)
        .map_err(|e| ApiError::Internal(format!("invalid frontend URL: {e}")))?;

    {
        let mut pairs = url.query_pairs_mut();
        if let Some(map) = payload.as_object() {
            for (key, value) in map {
                match value {
                    Value::String(s) => {
                        pairs.append_pair(key, s);
                    }
                    Value::Number(n) => {
                        pairs.append_pair(key, &n.to_string());
                    }
                    Value::Bool(b) => {
                        pairs.append_pair(key, if *b { "true" } else { "false" });
                    }
                    // Nested structures have no query-string representation.
                    _ => {}
                }
            }
        }
        pairs.append_pair("state", state);
    }

    Ok(url.into())
}

/// Redirect-mode counterpart for failures: send the caller back to the frontend
/// with `error` and `error_description` as query parameters.
///
/// When no frontend URL is configured (or it does not parse), the original
/// error is handed back so it still surfaces as a JSON body.
pub fn error_redirect_url(frontend_url: Option<&str>, err: ApiError) -> Result<String, ApiError> {
    let Some(frontend_url) = frontend_url else {
        return Err(err);
    };
    let Ok(mut url) = Url::parse(frontend_url) else {
        return Err(err);
    };

    let (_, code, description) = err.into_parts();
    url.query_pairs_mut()
        .append_pair("error", &code)
        .append_pair("error_description", &description);

    Ok(url.into())
}
