use axum::{
    Json, Router,
    extract::{Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use axum_extra::extract::{PrivateCookieJar, cookie::Cookie};
use url::Url;

use super::{LOGIN_SCOPE, client::TokenRequest, service};
use crate::auth::{cookies, csrf, models::CallbackParams};
use crate::{config::ResponseMode, error::ApiError, router::preflight, state::ApiState};

pub fn routes() -> Router<ApiState> {
    Router::new()
        .route("/auth/tiktok", get(tiktok_auth).options(preflight))
        .route("/auth/callback", get(auth_callback).options(preflight))
}

/// Kick off the authorization flow: issue a CSRF state token, remember it in a
/// private cookie, and redirect to the TikTok consent screen.
async fn tiktok_auth(
    State(state): State<ApiState>,
    jar: PrivateCookieJar,
) -> Result<(PrivateCookieJar, Response), ApiError> {
    let credentials = state
        .credentials
        .as_ref()
        .ok_or_else(ApiError::missing_credentials)?;

    let csrf_token = csrf::generate_state_token();

    let mut auth_url = Url::parse(&state.authorize_url)
        .map_err(|e| ApiError::Internal(format!("invalid authorize URL: {e}")))?;
    auth_url
        .query_pairs_mut()
        .append_pair("client_key", &credentials.client_key)
        .append_pair("response_type", "code")
        .append_pair("scope", LOGIN_SCOPE)
        .append_pair("redirect_uri", &credentials.redirect_uri)
        .append_pair("state", &csrf_token);

    let cookie = cookies::create_csrf_cookie(
        csrf_token,
        &state.environment,
        state.csrf_cookie_ttl_seconds,
    );
    let jar = jar.add(cookie);

    Ok((jar, found(auth_url.as_str())))
}

/// Exchange the authorization code for tokens.
///
/// In JSON mode failures come back as an error body; in redirect mode a
/// browser is mid-redirect and cannot handle a JSON body, so failures are sent
/// back to the frontend with `error`/`error_description` as query parameters.
async fn auth_callback(
    State(state): State<ApiState>,
    jar: PrivateCookieJar,
    Query(query): Query<CallbackParams>,
) -> (PrivateCookieJar, Response) {
    let (jar, outcome) = exchange_code(&state, jar, query).await;

    let response = match outcome {
        Ok(response) => response,
        Err(err) => match state.response_mode {
            ResponseMode::Json => err.into_response(),
            ResponseMode::Redirect => {
                match service::error_redirect_url(state.frontend_url.as_deref(), err) {
                    Ok(target) => found(&target),
                    Err(err) => err.into_response(),
                }
            }
        },
    };

    (jar, response)
}

/// Linear validate -> call -> map sequence: check the query parameters, check
/// configuration, make exactly one outbound call, then shape the success
/// response according to the configured strategy.
async fn exchange_code(
    state: &ApiState,
    jar: PrivateCookieJar,
    query: CallbackParams,
) -> (PrivateCookieJar, Result<Response, ApiError>) {
    let Some(code) = query.code else {
        if let Some(provider_error) = &query.error {
            tracing::warn!(
                error = %provider_error,
                description = query.error_description.as_deref().unwrap_or(""),
                "provider redirected back without an authorization code"
            );
        }
        return (jar, Err(ApiError::MissingCode));
    };

    let Some(state_param) = query.state else {
        return (jar, Err(ApiError::MissingState));
    };

    // When this proxy issued the flow, the cookie must match the state
    // parameter. A request without the cookie is still accepted on presence of
    // `state` alone, for flows initiated outside the proxy.
    let jar = match jar.get(cookies::CSRF_COOKIE) {
        Some(cookie) if cookie.value() != state_param => {
            return (jar, Err(ApiError::CsrfMismatch));
        }
        Some(_) => jar.remove(Cookie::from(cookies::CSRF_COOKIE)),
        None => jar,
    };

    let Some(credentials) = state.credentials.as_ref() else {
        return (jar, Err(ApiError::missing_credentials()));
    };

    let request = TokenRequest::authorization_code(credentials, code);
    let provider_response = match state.exchanger.exchange(&state.token_url, &request).await {
        Ok(response) => response,
        Err(err) => return (jar, Err(service::map_exchange_error(err))),
    };

    let payload = match service::classify_response(provider_response) {
        Ok(payload) => payload,
        Err(err) => return (jar, Err(err)),
    };

    let response = match state.response_mode {
        ResponseMode::Json => match service::json_success(payload, state_param) {
            Ok(body) => Json(body).into_response(),
            Err(err) => return (jar, Err(err)),
        },
        ResponseMode::Redirect => {
            match service::redirect_url(state.frontend_url.as_deref(), &payload, &state_param) {
                Ok(target) => found(&target),
                Err(err) => return (jar, Err(err)),
            }
        }
    };

    (jar, Ok(response))
}

/// 302 Found. `axum::response::Redirect` only offers 303/307/308, and the
/// Login Kit docs describe the kickoff as a plain 302.
fn found(location: &str) -> Response {
    (
        StatusCode::FOUND,
        [(header::LOCATION, location.to_owned())],
    )
        .into_response()
}
