use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::utils::league::normalize_league;

/// League label used when the source could not tell which league a match belongs to
pub const UNKNOWN_LEAGUE: &str = "Unknown";

fn unknown_league() -> String {
    UNKNOWN_LEAGUE.to_string()
}

/// A match record as it comes out of a match source, before league normalization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawMatch {
    pub datetime: String,
    #[serde(default = "unknown_league")]
    pub league: String,
    pub team1: String,
    pub team2: String,
    #[serde(default)]
    pub odds: Vec<String>,
    #[serde(default)]
    pub match_url: String,
}

/// A scraped match with a canonical league label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    pub datetime: String,  // ISO-8601 kickoff, kept as the source wrote it
    pub league: String,
    pub team1: String,
    pub team2: String,
    pub odds: Vec<String>, // Outcome order is source-defined
    pub match_url: String,
}

impl Match {
    /// Normalize the league of a raw record and turn it into a match
    pub fn from_raw(raw: RawMatch) -> Self {
        let league = normalize_league(&raw);
        Self {
            datetime: raw.datetime,
            league,
            team1: raw.team1,
            team2: raw.team2,
            odds: raw.odds,
            match_url: raw.match_url,
        }
    }

    /// Odds joined the way the tabular exports show them
    pub fn odds_display(&self) -> String {
        self.odds.join(", ")
    }
}

/// Phase of the scrape job, derived from the job status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobPhase {
    Idle,
    Running,
    Completed,
    Failed,
}

/// How the last finished run ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum JobOutcome {
    Success {
        match_count: usize,
        finished_at: DateTime<Utc>,
    },
    Failure {
        reason: String,
        finished_at: DateTime<Utc>,
    },
}

/// Point-in-time view of the scrape job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusSnapshot {
    pub is_running: bool,
    pub progress: String,
    pub start_time: Option<DateTime<Utc>>,
    pub matches_found: usize,
    pub state: JobPhase,
    pub last_outcome: Option<JobOutcome>,
}

/// Number of matches seen for one league
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeagueCount {
    pub league: String,
    pub count: usize,
}
