use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::error::{FetchError, ScrapeError};
use crate::models::{JobOutcome, JobPhase, Match, RawMatch, StatusSnapshot};
use crate::scrapers::{MatchFetcher, UserAgentPool};
use crate::store::MatchStore;

pub const PROGRESS_NOT_STARTED: &str = "Not started";
pub const PROGRESS_STARTING: &str = "Starting scrape...";
pub const PROGRESS_FETCHING: &str = "Fetching matches...";

#[derive(Debug, Clone)]
struct JobStatus {
    is_running: bool,
    progress: String,
    start_time: Option<DateTime<Utc>>,
    last_outcome: Option<JobOutcome>,
}

impl JobStatus {
    fn phase(&self) -> JobPhase {
        if self.is_running {
            return JobPhase::Running;
        }
        match self.last_outcome {
            None => JobPhase::Idle,
            Some(JobOutcome::Success { .. }) => JobPhase::Completed,
            Some(JobOutcome::Failure { .. }) => JobPhase::Failed,
        }
    }
}

impl Default for JobStatus {
    fn default() -> Self {
        Self {
            is_running: false,
            progress: PROGRESS_NOT_STARTED.to_string(),
            start_time: None,
            last_outcome: None,
        }
    }
}

/// Reply to an asynchronous start request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StartOutcome {
    Started {
        progress: String,
        start_time: DateTime<Utc>,
    },
    AlreadyRunning {
        progress: String,
        start_time: Option<DateTime<Utc>>,
    },
}

/// Owns the scrape job status and the match store.
///
/// At most one run is in flight. The running flag is checked and set under
/// one lock, and every run ends with the flag cleared, whatever the fetch did.
pub struct Orchestrator {
    fetcher: Arc<dyn MatchFetcher>,
    user_agents: UserAgentPool,
    fetch_timeout: Option<Duration>,
    status: Mutex<JobStatus>,
    store: MatchStore,
}

impl Orchestrator {
    pub fn new(fetcher: Arc<dyn MatchFetcher>) -> Self {
        Self {
            fetcher,
            user_agents: UserAgentPool::default(),
            fetch_timeout: None,
            status: Mutex::new(JobStatus::default()),
            store: MatchStore::new(),
        }
    }

    pub fn with_user_agents(mut self, user_agents: UserAgentPool) -> Self {
        self.user_agents = user_agents;
        self
    }

    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = Some(timeout);
        self
    }

    pub fn store(&self) -> &MatchStore {
        &self.store
    }

    /// Start a run in the background, or report the one already in flight
    pub async fn start_async(self: &Arc<Self>) -> StartOutcome {
        let start_time = match self.try_begin().await {
            Ok(start_time) => start_time,
            Err(status) => {
                warn!(progress = %status.progress, "scrape requested while a job is running");
                return StartOutcome::AlreadyRunning {
                    progress: status.progress,
                    start_time: status.start_time,
                };
            }
        };

        let this = Arc::clone(self);
        tokio::spawn(async move {
            // Failures are recorded in the job status by run()
            let _ = this.run().await;
        });

        StartOutcome::Started {
            progress: PROGRESS_STARTING.to_string(),
            start_time,
        }
    }

    /// Run a scrape and wait for the result
    pub async fn start_sync(&self) -> Result<Arc<Vec<Match>>, ScrapeError> {
        if self.try_begin().await.is_err() {
            warn!("synchronous scrape rejected, a job is already running");
            return Err(ScrapeError::Conflict);
        }
        Ok(self.run().await?)
    }

    pub async fn status(&self) -> StatusSnapshot {
        let status = self.status.lock().await.clone();
        StatusSnapshot {
            is_running: status.is_running,
            state: status.phase(),
            progress: status.progress,
            start_time: status.start_time,
            matches_found: self.store.len().await,
            last_outcome: status.last_outcome,
        }
    }

    /// Mark the job running if it is idle; hands back the current status otherwise
    async fn try_begin(&self) -> Result<DateTime<Utc>, JobStatus> {
        let mut status = self.status.lock().await;
        if status.is_running {
            return Err(status.clone());
        }

        let now = Utc::now();
        status.is_running = true;
        status.start_time = Some(now);
        status.progress = PROGRESS_STARTING.to_string();
        Ok(now)
    }

    async fn set_progress(&self, progress: &str) {
        self.status.lock().await.progress = progress.to_string();
    }

    async fn run(&self) -> Result<Arc<Vec<Match>>, FetchError> {
        info!("starting scrape run");
        self.set_progress(PROGRESS_FETCHING).await;

        let user_agent = self.user_agents.pick();
        info!(user_agent = %user_agent, "using user agent");

        match self.fetch(user_agent).await {
            Ok(raw) => {
                let matches: Arc<Vec<Match>> =
                    Arc::new(raw.into_iter().map(Match::from_raw).collect());
                let count = matches.len();

                self.store.replace(Arc::clone(&matches)).await;

                let mut status = self.status.lock().await;
                status.is_running = false;
                status.progress = format!("Completed: scraped {} matches", count);
                status.last_outcome = Some(JobOutcome::Success {
                    match_count: count,
                    finished_at: Utc::now(),
                });
                info!(count, "scrape run completed");

                Ok(matches)
            }
            Err(e) => {
                error!(error = %e, "scrape run failed");
                self.store.clear().await;

                let mut status = self.status.lock().await;
                status.is_running = false;
                status.progress = format!("Error: {}", e);
                status.last_outcome = Some(JobOutcome::Failure {
                    reason: e.to_string(),
                    finished_at: Utc::now(),
                });

                Err(e)
            }
        }
    }

    /// Call the match source on its own task so a panic there becomes a fetch error
    async fn fetch(&self, user_agent: String) -> Result<Vec<RawMatch>, FetchError> {
        let fetcher = Arc::clone(&self.fetcher);
        let mut task = tokio::spawn(async move { fetcher.fetch(&user_agent).await });

        let joined = match self.fetch_timeout {
            Some(limit) => match tokio::time::timeout(limit, &mut task).await {
                Ok(joined) => joined,
                Err(_) => {
                    task.abort();
                    return Err(FetchError::Timeout(limit));
                }
            },
            None => task.await,
        };

        joined.map_err(|e| FetchError::Aborted(e.to_string()))?
    }
}
