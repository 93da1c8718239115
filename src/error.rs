use std::time::Duration;

use thiserror::Error;

/// Failure of a match source
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("match feed returned HTTP {0}")]
    Status(u16),

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse match data: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("fetch timed out after {0:?}")]
    Timeout(Duration),

    #[error("fetch task aborted: {0}")]
    Aborted(String),

    #[error("{0}")]
    Source(String),
}

/// Failure to start or finish a scrape run
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("a scrape job is already running")]
    Conflict,

    #[error("Scraping failed: {0}")]
    Failed(#[from] FetchError),
}

/// Failure of a read over the match store
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("No scraped data available")]
    NoData,

    #[error("No matches found for league: {0}")]
    NotFound(String),
}

/// Failure while building export files
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to serialize JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to build archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid export timestamp: {0}")]
    Timestamp(String),
}

/// Invalid environment configuration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?} ({reason})")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}
