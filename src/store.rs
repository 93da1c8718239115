use std::sync::Arc;

use tokio::sync::RwLock;

use crate::error::QueryError;
use crate::models::{LeagueCount, Match};

/// Holder of the most recent result set.
///
/// Readers get an `Arc` snapshot; a run publishes by swapping in a fully built
/// sequence, so a query never sees a partial write.
#[derive(Debug, Default)]
pub struct MatchStore {
    matches: RwLock<Arc<Vec<Match>>>,
}

impl MatchStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn snapshot(&self) -> Arc<Vec<Match>> {
        self.matches.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.matches.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub(crate) async fn replace(&self, matches: Arc<Vec<Match>>) {
        *self.matches.write().await = matches;
    }

    pub(crate) async fn clear(&self) {
        *self.matches.write().await = Arc::new(Vec::new());
    }

    /// All matches from the last successful run
    pub async fn all_matches(&self) -> Result<Arc<Vec<Match>>, QueryError> {
        let matches = self.snapshot().await;
        if matches.is_empty() {
            return Err(QueryError::NoData);
        }
        Ok(matches)
    }

    /// Matches whose league equals `league`, ignoring case
    pub async fn matches_by_league(&self, league: &str) -> Result<Vec<Match>, QueryError> {
        let matches = self.all_matches().await?;
        let filtered = filter_by_league(&matches, league);
        if filtered.is_empty() {
            return Err(QueryError::NotFound(league.to_string()));
        }
        Ok(filtered)
    }

    /// Per-league counts in first-seen order
    pub async fn league_summary(&self) -> Vec<LeagueCount> {
        league_counts(&self.snapshot().await)
    }
}

pub fn filter_by_league(matches: &[Match], league: &str) -> Vec<Match> {
    let wanted = league.to_lowercase();
    matches
        .iter()
        .filter(|m| m.league.to_lowercase() == wanted)
        .cloned()
        .collect()
}

pub fn league_counts(matches: &[Match]) -> Vec<LeagueCount> {
    let mut counts: Vec<LeagueCount> = Vec::new();
    for m in matches {
        match counts.iter_mut().find(|c| c.league == m.league) {
            Some(entry) => entry.count += 1,
            None => counts.push(LeagueCount {
                league: m.league.clone(),
                count: 1,
            }),
        }
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(league: &str, team1: &str) -> Match {
        Match {
            datetime: "2024-05-01T18:00:00".to_string(),
            league: league.to_string(),
            team1: team1.to_string(),
            team2: "Opponent".to_string(),
            odds: vec!["+150".to_string(), "-110".to_string()],
            match_url: format!("https://example.com/{}", league.to_lowercase()),
        }
    }

    #[tokio::test]
    async fn test_empty_store_has_no_data() {
        let store = MatchStore::new();
        assert_eq!(store.all_matches().await.unwrap_err(), QueryError::NoData);
        assert_eq!(
            store.matches_by_league("nfl").await.unwrap_err(),
            QueryError::NoData
        );
    }

    #[tokio::test]
    async fn test_filter_is_case_insensitive() {
        let store = MatchStore::new();
        store
            .replace(Arc::new(vec![
                sample("NFL", "Chiefs"),
                sample("Tennis", "Djokovic"),
                sample("NFL", "Packers"),
            ]))
            .await;

        let nfl = store.matches_by_league("nfl").await.unwrap();
        assert_eq!(nfl.len(), 2);
        assert_eq!(nfl[0].team1, "Chiefs");
        assert_eq!(nfl[1].team1, "Packers");

        let tennis = store.matches_by_league("TENNIS").await.unwrap();
        assert_eq!(tennis.len(), 1);
    }

    #[tokio::test]
    async fn test_unmatched_league_is_not_found() {
        let store = MatchStore::new();
        store.replace(Arc::new(vec![sample("NFL", "Chiefs")])).await;
        assert_eq!(
            store.matches_by_league("futsal").await.unwrap_err(),
            QueryError::NotFound("futsal".to_string())
        );
    }

    #[tokio::test]
    async fn test_league_summary_reads_current_snapshot() {
        let store = MatchStore::new();
        assert!(store.league_summary().await.is_empty());

        store
            .replace(Arc::new(vec![sample("NFL", "Chiefs"), sample("NFL", "Packers")]))
            .await;
        assert_eq!(
            store.league_summary().await,
            vec![LeagueCount {
                league: "NFL".to_string(),
                count: 2,
            }]
        );
    }

    #[tokio::test]
    async fn test_clear_empties_store() {
        let store = MatchStore::new();
        store.replace(Arc::new(vec![sample("NFL", "Chiefs")])).await;
        assert_eq!(store.len().await, 1);
        store.clear().await;
        assert!(store.is_empty().await);
    }

    #[test]
    fn test_league_counts_keep_first_seen_order() {
        let counts = league_counts(&[
            sample("Tennis", "a"),
            sample("NFL", "b"),
            sample("Tennis", "c"),
        ]);
        assert_eq!(
            counts,
            vec![
                LeagueCount {
                    league: "Tennis".to_string(),
                    count: 2,
                },
                LeagueCount {
                    league: "NFL".to_string(),
                    count: 1,
                },
            ]
        );
    }
}
