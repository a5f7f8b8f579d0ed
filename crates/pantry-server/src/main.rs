use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pantry_server::{create_router, AppState, Config};
use pantry_upstream::SpoonacularClient;

#[tokio::main]
async fn main() {
    // A missing .env file is fine; the environment may be set directly.
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            eprintln!("Required: SPOONACULAR_API_KEY=<key>");
            eprintln!("Optional: PANTRY_LISTEN_ADDR or PORT, FRONTEND_URL, SPOONACULAR_BASE_URL");
            std::process::exit(1);
        }
    };

    tracing::info!("Starting Pantry server");
    tracing::info!("Listen address: {}", config.listen_addr);
    tracing::info!("Upstream: {}", config.upstream_base_url);
    tracing::info!("Allowed origin: {:?}", config.frontend_origin);

    let upstream = SpoonacularClient::new(&config.upstream_base_url, &config.api_key);
    let state = AppState::new(upstream);

    // Build router
    let app = create_router(state).layer(config.cors_layer());

    // Start server
    let listener = match tokio::net::TcpListener::bind(&config.listen_addr).await {
        Ok(l) => l,
        Err(e) => {
            eprintln!("Failed to bind to {}: {}", config.listen_addr, e);
            std::process::exit(1);
        }
    };

    tracing::info!("Server running at http://{}", config.listen_addr);

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
