//! Standalone REST API server binary.
//!
//! ## Purpose
//! Runs the REST API server on its own, with Swagger UI at `/swagger-ui`.
//!
//! ## Intended use
//! Development and debugging. The workspace's main `recipebox-run` binary serves the same
//! router.

use api_rest::{router, AppState};
use recipebox_core::config::config_from_env_values;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Main entry point for the Recipebox REST API server.
///
/// # Environment Variables
/// - `RECIPEBOX_REST_ADDR`: Server address (default: "0.0.0.0:3000")
/// - `MEAL_API_URL`, `CACHE_TTL_SECS`, `CACHE_CAPACITY`, `MIN_REQUEST_INTERVAL_MS`,
///   `REQUEST_TIMEOUT_SECS`: meal API client settings
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - a configuration value is invalid,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = std::env::var("RECIPEBOX_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
    let cfg = config_from_env_values(|name| std::env::var(name).ok())?;

    tracing::info!("-- Starting Recipebox REST API on {}", addr);
    tracing::info!(meal_api = cfg.meal_api_url(), "meal API configured");

    let app = router(AppState::in_memory(&cfg)?);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
