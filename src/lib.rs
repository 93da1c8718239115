pub mod config;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod scheduler;
pub mod scrapers;
pub mod store;
pub mod utils;
pub mod web;

pub use config::*;
pub use error::*;
pub use models::*;
pub use orchestrator::*;
pub use scrapers::*;
pub use store::*;
pub use utils::*;

use std::sync::Arc;

/// Build the orchestrator for a loaded configuration
pub fn build_orchestrator(config: &Config) -> Arc<Orchestrator> {
    let fetcher = config.source.clone().into_fetcher();
    Arc::new(
        Orchestrator::new(fetcher)
            .with_fetch_timeout(config.fetch_timeout)
            .with_user_agents(UserAgentPool::new(config.user_agents.clone())),
    )
}

/// Install the tracing subscriber used by both binaries (`RUST_LOG`, default `info`)
pub fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
