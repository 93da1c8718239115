use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::error::ConfigError;
use crate::scrapers::{FeedScraper, JsonFileSource, MatchFetcher, SampleSource, USER_AGENTS};

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost";

/// Where scrape runs get their raw matches from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchSource {
    Feed(String),
    File(PathBuf),
    Sample,
}

impl MatchSource {
    pub fn into_fetcher(self) -> Arc<dyn MatchFetcher> {
        match self {
            MatchSource::Feed(url) => Arc::new(FeedScraper::new(url)),
            MatchSource::File(path) => Arc::new(JsonFileSource::new(path)),
            MatchSource::Sample => Arc::new(SampleSource::new()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub bind_addr: String,
    pub source: MatchSource,
    pub scrape_interval: Option<Duration>,
    pub fetch_timeout: Duration,
    pub cors_origins: Vec<String>,
    /// Pool the per-run user agent is drawn from
    pub user_agents: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            source: MatchSource::Sample,
            scrape_interval: None,
            fetch_timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
            cors_origins: vec![DEFAULT_CORS_ORIGIN.to_string()],
            user_agents: USER_AGENTS.iter().map(|ua| ua.to_string()).collect(),
        }
    }
}

impl Config {
    /// Load `.env` and read settings from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        let config = Self::from_lookup(|key| std::env::var(key).ok())?;
        info!(
            bind_addr = %config.bind_addr,
            source = ?config.source,
            "configuration loaded"
        );
        Ok(config)
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let source = if let Some(url) = get("FEED_URL") {
            MatchSource::Feed(url)
        } else if let Some(path) = get("FEED_FILE") {
            MatchSource::File(PathBuf::from(path))
        } else {
            MatchSource::Sample
        };

        let scrape_interval = match get("SCRAPE_INTERVAL_MINS") {
            Some(value) => match parse_u64("SCRAPE_INTERVAL_MINS", &value)? {
                0 => None,
                mins => Some(Duration::from_secs(mins * 60)),
            },
            None => None,
        };

        let fetch_timeout = match get("FETCH_TIMEOUT_SECS") {
            Some(value) => Duration::from_secs(parse_u64("FETCH_TIMEOUT_SECS", &value)?),
            None => defaults.fetch_timeout,
        };

        let cors_origins = match get("CORS_ORIGINS") {
            Some(value) => value
                .split(',')
                .map(|origin| origin.trim().trim_end_matches('/').to_string())
                .filter(|origin| !origin.is_empty())
                .collect(),
            None => defaults.cors_origins,
        };

        // User agent strings contain commas and semicolons, so the list is `|`-separated
        let user_agents: Vec<String> = match get("USER_AGENTS") {
            Some(value) => value
                .split('|')
                .map(|ua| ua.trim().to_string())
                .filter(|ua| !ua.is_empty())
                .collect(),
            None => Vec::new(),
        };

        Ok(Self {
            bind_addr: get("BIND_ADDR").unwrap_or(defaults.bind_addr),
            source,
            scrape_interval,
            fetch_timeout,
            cors_origins,
            user_agents: if user_agents.is_empty() {
                defaults.user_agents
            } else {
                user_agents
            },
        })
    }
}

fn parse_u64(key: &'static str, value: &str) -> Result<u64, ConfigError> {
    value.trim().parse::<u64>().map_err(|e| ConfigError::Invalid {
        key,
        value: value.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        assert_eq!(config_from(&[]).unwrap(), Config::default());
    }

    #[test]
    fn test_feed_url_wins_over_file() {
        let config = config_from(&[
            ("FEED_URL", "https://feeds.example.com/matches.json"),
            ("FEED_FILE", "raw.json"),
        ])
        .unwrap();
        assert_eq!(
            config.source,
            MatchSource::Feed("https://feeds.example.com/matches.json".to_string())
        );

        let config = config_from(&[("FEED_URL", ""), ("FEED_FILE", "raw.json")]).unwrap();
        assert_eq!(config.source, MatchSource::File(PathBuf::from("raw.json")));
    }

    #[test]
    fn test_interval_and_timeout() {
        let config = config_from(&[
            ("SCRAPE_INTERVAL_MINS", "30"),
            ("FETCH_TIMEOUT_SECS", "45"),
        ])
        .unwrap();
        assert_eq!(config.scrape_interval, Some(Duration::from_secs(1800)));
        assert_eq!(config.fetch_timeout, Duration::from_secs(45));

        let config = config_from(&[("SCRAPE_INTERVAL_MINS", "0")]).unwrap();
        assert_eq!(config.scrape_interval, None);
    }

    #[test]
    fn test_invalid_number_is_rejected() {
        let err = config_from(&[("FETCH_TIMEOUT_SECS", "soon")]).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid { key: "FETCH_TIMEOUT_SECS", .. }
        ));
    }

    #[test]
    fn test_user_agents_are_pipe_separated() {
        let config = config_from(&[(
            "USER_AGENTS",
            "Mozilla/5.0 (X11; Linux x86_64) Firefox/127.0 | curl/8.5.0",
        )])
        .unwrap();
        assert_eq!(
            config.user_agents,
            vec!["Mozilla/5.0 (X11; Linux x86_64) Firefox/127.0", "curl/8.5.0"]
        );

        let config = config_from(&[("USER_AGENTS", " | ")]).unwrap();
        assert_eq!(config.user_agents, Config::default().user_agents);
    }

    #[test]
    fn test_cors_origins_are_split() {
        let config = config_from(&[(
            "CORS_ORIGINS",
            "https://dashboard.example.com/, http://localhost",
        )])
        .unwrap();
        assert_eq!(
            config.cors_origins,
            vec!["https://dashboard.example.com", "http://localhost"]
        );
    }
}
