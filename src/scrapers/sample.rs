use async_trait::async_trait;
use chrono::{Duration, Local};

use super::MatchFetcher;
use crate::error::FetchError;
use crate::models::{RawMatch, UNKNOWN_LEAGUE};

/// (label the source reports, URL slug, fixtures)
const SAMPLE_FIXTURES: [(&str, &str, [(&str, &str); 2]); 9] = [
    (
        "NFL",
        "nfl",
        [
            ("Kansas City Chiefs", "Buffalo Bills"),
            ("Green Bay Packers", "Dallas Cowboys"),
        ],
    ),
    (
        "NBA",
        "nba",
        [
            ("Los Angeles Lakers", "Boston Celtics"),
            ("Golden State Warriors", "Miami Heat"),
        ],
    ),
    (
        "WNBA",
        "wnba",
        [
            ("Las Vegas Aces", "New York Liberty"),
            ("Seattle Storm", "Phoenix Mercury"),
        ],
    ),
    (
        "NCAA",
        "ncaa",
        [
            ("Duke Blue Devils", "North Carolina Tar Heels"),
            ("UCLA Bruins", "USC Trojans"),
        ],
    ),
    (
        UNKNOWN_LEAGUE,
        "tennis",
        [
            ("Novak Djokovic", "Rafael Nadal"),
            ("Serena Williams", "Venus Williams"),
        ],
    ),
    (
        UNKNOWN_LEAGUE,
        "football",
        [
            ("Manchester United", "Liverpool"),
            ("Barcelona", "Real Madrid"),
        ],
    ),
    (
        UNKNOWN_LEAGUE,
        "basketball",
        [
            ("Team Phoenix", "Team Thunder"),
            ("Team Lightning", "Team Storm"),
        ],
    ),
    (
        UNKNOWN_LEAGUE,
        "baseball",
        [
            ("New York Yankees", "Boston Red Sox"),
            ("Los Angeles Dodgers", "San Francisco Giants"),
        ],
    ),
    (
        UNKNOWN_LEAGUE,
        "futsal",
        [
            ("Team Alpha", "Team Beta"),
            ("Team Gamma", "Team Delta"),
        ],
    ),
];

/// Generates a fixed set of demo matches; used when no real feed is configured
#[derive(Debug, Default, Clone, Copy)]
pub struct SampleSource;

impl SampleSource {
    pub fn new() -> Self {
        Self
    }

    pub fn generate(&self) -> Vec<RawMatch> {
        let now = Local::now().naive_local();
        let mut matches = Vec::new();

        for (league, slug, fixtures) in SAMPLE_FIXTURES {
            for (i, (team1, team2)) in fixtures.iter().enumerate() {
                let kickoff = now + Duration::hours(i as i64 + 1);
                matches.push(RawMatch {
                    datetime: kickoff.format("%Y-%m-%dT%H:%M:%S").to_string(),
                    league: league.to_string(),
                    team1: team1.to_string(),
                    team2: team2.to_string(),
                    odds: vec!["+150".to_string(), "-110".to_string(), "+200".to_string()],
                    match_url: format!("https://www.oddsportal.com/sample/{}", slug),
                });
            }
        }

        matches
    }
}

#[async_trait]
impl MatchFetcher for SampleSource {
    async fn fetch(&self, _user_agent: &str) -> Result<Vec<RawMatch>, FetchError> {
        Ok(self.generate())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Match;

    #[test]
    fn test_generates_two_matches_per_league() {
        let matches = SampleSource::new().generate();
        assert_eq!(matches.len(), SAMPLE_FIXTURES.len() * 2);
    }

    #[test]
    fn test_unknown_samples_normalize_from_url() {
        let leagues: Vec<String> = SampleSource::new()
            .generate()
            .into_iter()
            .map(|raw| Match::from_raw(raw).league)
            .collect();

        assert!(!leagues.iter().any(|l| l == UNKNOWN_LEAGUE));
        assert!(leagues.iter().any(|l| l == "Football"));
        assert!(leagues.iter().any(|l| l == "NBA"));
    }
}
