use std::path::PathBuf;

use async_trait::async_trait;

use super::MatchFetcher;
use crate::error::FetchError;
use crate::models::RawMatch;

/// Replays raw matches from a JSON file written by an earlier scrape
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl MatchFetcher for JsonFileSource {
    async fn fetch(&self, _user_agent: &str) -> Result<Vec<RawMatch>, FetchError> {
        let json = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| FetchError::Io {
                path: self.path.display().to_string(),
                source,
            })?;
        let matches: Vec<RawMatch> = serde_json::from_str(&json)?;
        Ok(matches)
    }
}
