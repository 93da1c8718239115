use async_trait::async_trait;
use reqwest::header::USER_AGENT;
use tracing::debug;

use super::MatchFetcher;
use crate::error::FetchError;
use crate::models::RawMatch;

/// Pulls raw matches from an HTTP endpoint serving a JSON array of records
pub struct FeedScraper {
    url: String,
    client: reqwest::Client,
}

impl FeedScraper {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl MatchFetcher for FeedScraper {
    async fn fetch(&self, user_agent: &str) -> Result<Vec<RawMatch>, FetchError> {
        debug!(url = %self.url, "requesting match feed");

        let response = self
            .client
            .get(&self.url)
            .header(USER_AGENT, user_agent)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(FetchError::Status(response.status().as_u16()));
        }

        let body = response.text().await?;
        let matches: Vec<RawMatch> = serde_json::from_str(&body)?;
        Ok(matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    #[ignore]
    async fn test_fetch_feed() {
        dotenv::dotenv().ok();
        let url = std::env::var("FEED_URL").expect("FEED_URL not set");
        let scraper = FeedScraper::new(url);

        let matches = scraper
            .fetch(crate::scrapers::user_agent::USER_AGENTS[0])
            .await
            .unwrap();
        assert!(!matches.is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_feed_is_fetch_error() {
        let scraper = FeedScraper::new("http://127.0.0.1:9/matches");
        let err = scraper.fetch("test-agent").await.unwrap_err();
        assert!(matches!(err, FetchError::Http(_)));
    }
}
