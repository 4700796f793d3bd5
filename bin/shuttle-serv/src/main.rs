use axum::middleware;
use tlp_api::{config::ApiConfig, state::ApiState};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

#[shuttle_runtime::main]
async fn main(
    #[shuttle_runtime::Secrets] secrets: shuttle_runtime::SecretStore,
) -> shuttle_axum::ShuttleAxum {
    // Load configuration from Shuttle secrets
    let config = ApiConfig::from_shuttle_secrets(&secrets)
        .map_err(|e| anyhow::anyhow!("Config error: {}", e))?;

    // Note: Shuttle already initializes tracing, so we skip our custom init
    // The Shuttle runtime provides default tracing subscriber

    // Configure CORS with allowed origins from config
    let cors = tlp_api::middleware::cors::create_cors_layer(config.parsed_allowed_origins());

    // Configure HTTP request/response tracing
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    let environment = config.env.clone();
    let state = ApiState::new(config)?;

    let app = tlp_api::router::router()
        .with_state(state)
        .layer(cors)
        .layer(trace_layer)
        .layer(middleware::from_fn(
            tlp_api::middleware::request_id::request_id_middleware,
        ));

    tracing::info!("Environment: {:?}", environment);
    tracing::info!("TikTok login proxy ready:");
    tracing::info!("  - Authorization kickoff at /auth/tiktok");
    tracing::info!("  - Token exchange callback at /auth/callback");
    tracing::info!("  - Health check at /health");
    tracing::info!("  - Request ID tracing (X-Request-ID header)");

    Ok(app.into())
}
