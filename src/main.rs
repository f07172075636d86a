//! TYTC Backend server entry point.

use std::sync::Arc;

use tytc_backend::config::Config;
use tytc_backend::db::{self, Repository};
use tytc_backend::{create_router, init_tracing, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env();

    // Initialize logging
    init_tracing(&config.log_level, config.log_format);

    tracing::info!("Starting TYTC Backend");
    tracing::info!("Database path: {:?}", config.db_path);
    tracing::info!("Bind address: {}", config.bind_addr);
    tracing::info!("Service prefix: {:?}", config.service_prefix);

    // Warn if token is not configured
    if config.api_token.is_none() {
        tracing::warn!("No API token configured (TYTC_API_TOKEN). Authentication is disabled!");
    }
    if config.read_fail_open {
        tracing::info!("Read failures degrade to empty results (TYTC_READ_FAIL_OPEN)");
    }

    // Initialize database
    let pool = db::init_database(&config.db_path).await?;
    let repo = Arc::new(Repository::new(pool));

    // Seed defaults; the site works without them, so a failure is not fatal
    if let Err(e) = repo.initialize().await {
        tracing::warn!("Startup initialization failed: {}", e);
    }

    // Create application state
    let state = AppState {
        repo,
        config: Arc::new(config.clone()),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
