use tlp_api::{config::ApiConfig, state::ApiState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration from environment variables
    dotenvy::dotenv().ok();
    let config = ApiConfig::from_env()?;

    tlp_api::tracing::init_tracing(&config.env);

    // Configure CORS with allowed origins from config
    let cors = tlp_api::middleware::cors::create_cors_layer(config.parsed_allowed_origins());

    // Initialize the application state
    let state = ApiState::new(config)?;

    // Create the application router
    let app = tlp_api::router::router()
        .with_state(state)
        .layer(cors)
        .layer(axum::middleware::from_fn(
            tlp_api::middleware::request_id::request_id_middleware,
        ));

    // Start the server
    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
    tracing::info!("Server running on http://localhost:3000");
    axum::serve(listener, app).await?;

    Ok(())
}
