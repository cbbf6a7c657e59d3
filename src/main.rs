use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{AppState, router};
use recipebox_core::config::config_from_env_values;
use std::time::Duration;

/// Main entry point for the Recipebox application
///
/// Serves the REST API (with Swagger UI) until Ctrl-C, then drains in-flight requests.
/// Expired meal API responses are swept from the cache once per TTL.
///
/// # Environment Variables
/// - `RECIPEBOX_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `MEAL_API_URL`: meal API base URL (default: the public meal database)
/// - `CACHE_TTL_SECS`: response cache TTL (default: 86400)
/// - `CACHE_CAPACITY`: response cache bound, or `unbounded` (default: 500)
/// - `MIN_REQUEST_INTERVAL_MS`: spacing between outbound calls (default: 6000)
/// - `REQUEST_TIMEOUT_SECS`: outbound request timeout (default: 10)
///
/// # Returns
/// * `Ok(())` - If the server starts and shuts down cleanly
/// * `Err(anyhow::Error)` - If configuration, startup or the server fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("recipebox_run=info".parse()?)
                .add_directive("recipebox_core=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr =
        std::env::var("RECIPEBOX_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
    let cfg = config_from_env_values(|name| std::env::var(name).ok())?;

    tracing::info!("++ Starting Recipebox REST on {}", rest_addr);

    let state = AppState::in_memory(&cfg)?;
    tokio::spawn(purge_expired_responses(state.clone(), cfg.cache_ttl()));

    let app = router(state);
    let listener = tokio::net::TcpListener::bind(&rest_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("-- Recipebox stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
}

async fn purge_expired_responses(state: AppState, every: Duration) {
    let mut ticker = tokio::time::interval(every);
    // the first tick completes immediately
    ticker.tick().await;
    loop {
        ticker.tick().await;
        let removed = state.search.meals().cache().purge_expired();
        tracing::debug!(removed, "purged expired meal API responses");
    }
}
