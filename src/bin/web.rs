use anyhow::{Context, Result};
use odds_scraper_api::scheduler::spawn_periodic_scrape;
use odds_scraper_api::web::{router, AppState};
use odds_scraper_api::{build_orchestrator, init_logging, Config};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Initialize logging
    init_logging();

    let config = Config::from_env().context("Invalid configuration")?;

    let orchestrator = build_orchestrator(&config);

    // Periodic scraping, if configured
    let _scheduler = config
        .scrape_interval
        .map(|every| spawn_periodic_scrape(Arc::clone(&orchestrator), every));

    let app = router(AppState::new(orchestrator), &config.cors_origins);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;

    info!("Starting web server at http://{}", config.bind_addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
