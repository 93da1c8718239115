use askama::Template;
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use tracing::info;

use super::AppState;
use crate::models::{JobOutcome, JobPhase};
use crate::orchestrator::StartOutcome;
use crate::store::league_counts;
use crate::utils::export::{export_stems, group_by_league};

mod filters {
    use chrono::{DateTime, Utc};

    pub fn format_time(time: &Option<DateTime<Utc>>) -> ::askama::Result<String> {
        Ok(match time {
            Some(t) => t.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            None => "never".to_string(),
        })
    }
}

struct LeagueRow {
    league: String,
    slug: String,
    count: usize,
}

#[derive(Template)]
#[template(path = "dashboard.html")]
struct DashboardTemplate {
    is_running: bool,
    state: String,
    progress: String,
    start_time: Option<chrono::DateTime<chrono::Utc>>,
    total_matches: usize,
    leagues: Vec<LeagueRow>,
    last_error: String,
}

struct HtmlTemplate<T>(T);

impl<T> IntoResponse for HtmlTemplate<T>
where
    T: Template,
{
    fn into_response(self) -> Response {
        match self.0.render() {
            Ok(html) => Html(html).into_response(),
            Err(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to render template: {}", err),
            )
                .into_response(),
        }
    }
}

fn phase_label(phase: JobPhase) -> &'static str {
    match phase {
        JobPhase::Idle => "idle",
        JobPhase::Running => "running",
        JobPhase::Completed => "completed",
        JobPhase::Failed => "failed",
    }
}

pub async fn dashboard(State(state): State<AppState>) -> impl IntoResponse {
    let status = state.orchestrator.status().await;
    let matches = state.orchestrator.store().snapshot().await;

    // Download links use the same stems as the export files
    let groups = group_by_league(&matches);
    let stems = export_stems(&groups);
    let leagues = league_counts(&matches)
        .into_iter()
        .map(|c| {
            let key = c.league.to_lowercase();
            let slug = groups
                .iter()
                .zip(&stems)
                .find(|(group, _)| group.league == key)
                .map(|(_, stem)| stem.clone())
                .unwrap_or_default();
            LeagueRow {
                league: c.league,
                slug,
                count: c.count,
            }
        })
        .collect();

    let last_error = match &status.last_outcome {
        Some(JobOutcome::Failure { reason, .. }) => reason.clone(),
        _ => String::new(),
    };

    let template = DashboardTemplate {
        is_running: status.is_running,
        state: phase_label(status.state).to_string(),
        progress: status.progress,
        start_time: status.start_time,
        total_matches: status.matches_found,
        leagues,
        last_error,
    };

    HtmlTemplate(template)
}

/// Form target for the dashboard button; starts a run and returns to the page
pub async fn start_scrape(State(state): State<AppState>) -> Redirect {
    if let StartOutcome::Started { .. } = state.orchestrator.start_async().await {
        info!("scrape started from the dashboard");
    }
    Redirect::to("/")
}
