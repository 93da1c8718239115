use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_stream::wrappers::IntervalStream;
use tokio_stream::StreamExt;
use tracing::{debug, info};

use crate::orchestrator::{Orchestrator, StartOutcome};

/// Trigger a scrape every `every`, starting right away.
///
/// Ticks that land while a run is still in flight are skipped by the
/// orchestrator's single-flight check.
pub fn spawn_periodic_scrape(orchestrator: Arc<Orchestrator>, every: Duration) -> JoinHandle<()> {
    info!(interval_secs = every.as_secs(), "periodic scraping enabled");

    let mut interval = tokio::time::interval(every);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut ticks = IntervalStream::new(interval);

    tokio::spawn(async move {
        while ticks.next().await.is_some() {
            match orchestrator.start_async().await {
                StartOutcome::Started { start_time, .. } => {
                    info!(%start_time, "scheduled scrape started");
                }
                StartOutcome::AlreadyRunning { progress, .. } => {
                    debug!(%progress, "scheduled scrape skipped");
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scrapers::SampleSource;

    #[tokio::test]
    async fn test_first_tick_runs_immediately() {
        let orchestrator = Arc::new(Orchestrator::new(Arc::new(SampleSource::new())));
        let handle = spawn_periodic_scrape(Arc::clone(&orchestrator), Duration::from_secs(3600));

        let mut found = 0;
        for _ in 0..200 {
            let status = orchestrator.status().await;
            if !status.is_running && status.matches_found > 0 {
                found = status.matches_found;
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        handle.abort();

        assert!(found > 0);
    }
}
