pub mod feed;
pub mod file;
pub mod sample;
pub mod user_agent;

pub use feed::FeedScraper;
pub use file::JsonFileSource;
pub use sample::SampleSource;
pub use user_agent::{UserAgentPool, USER_AGENTS};

use async_trait::async_trait;

use crate::error::FetchError;
use crate::models::RawMatch;

/// A source of raw match records.
///
/// Each call is one scrape; the orchestrator picks a fresh user agent per run.
#[async_trait]
pub trait MatchFetcher: Send + Sync {
    async fn fetch(&self, user_agent: &str) -> Result<Vec<RawMatch>, FetchError>;
}
