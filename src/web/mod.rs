pub mod dashboard;

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Local, Utc};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::error;

use crate::error::{ExportError, QueryError, ScrapeError};
use crate::models::{Match, StatusSnapshot};
use crate::orchestrator::{Orchestrator, StartOutcome};
use crate::utils::export::{
    archive_name, bundle, consolidated_file_name, export_stems, group_by_league,
    league_file_name, league_file_stem, to_csv, to_json, LeagueGroup, TableLayout,
};

const CSV_CONTENT_TYPE: &str = "text/csv; charset=utf-8";
const JSON_CONTENT_TYPE: &str = "application/json";
const ZIP_CONTENT_TYPE: &str = "application/zip";

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<Orchestrator>,
}

impl AppState {
    pub fn new(orchestrator: Arc<Orchestrator>) -> Self {
        Self { orchestrator }
    }
}

/// Errors surfaced by the HTTP handlers, mapped onto status codes
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Scrape(#[from] ScrapeError),

    #[error(transparent)]
    Query(#[from] QueryError),

    #[error(transparent)]
    Export(#[from] ExportError),
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Scrape(ScrapeError::Conflict) => StatusCode::CONFLICT,
            ApiError::Scrape(ScrapeError::Failed(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Query(_) => StatusCode::NOT_FOUND,
            ApiError::Export(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        }
        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}

#[derive(Serialize)]
struct MatchesResponse<'a> {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    league: Option<&'a str>,
    matches: &'a [Match],
    count: usize,
    timestamp: DateTime<Utc>,
}

#[derive(Serialize)]
struct ScrapeResponse<'a> {
    status: &'static str,
    message: String,
    matches: &'a [Match],
    timestamp: DateTime<Utc>,
}

/// Build the application router
pub fn router(state: AppState, cors_origins: &[String]) -> Router {
    let origins: Vec<HeaderValue> = cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(dashboard::dashboard))
        .route("/dashboard/scrape", post(dashboard::start_scrape))
        .route("/health", get(health))
        .route("/status", get(status))
        .route("/scrape", post(scrape))
        .route("/scrape-sync", post(scrape_sync))
        .route("/matches", get(all_matches))
        .route("/matches/:league", get(matches_by_league))
        .route("/export/matches.csv", get(export_all_csv))
        .route("/export/matches.json", get(export_all_json))
        .route("/export/archive.zip", get(export_archive))
        .route("/export/:league/matches.csv", get(export_league_csv))
        .route("/export/:league/matches.json", get(export_league_json))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "API is running" }))
}

async fn status(State(state): State<AppState>) -> Json<StatusSnapshot> {
    Json(state.orchestrator.status().await)
}

async fn scrape(State(state): State<AppState>) -> Json<StartOutcome> {
    Json(state.orchestrator.start_async().await)
}

async fn scrape_sync(State(state): State<AppState>) -> Result<Response, ApiError> {
    let matches = state.orchestrator.start_sync().await?;

    Ok(Json(ScrapeResponse {
        status: "success",
        message: format!("Scraped {} matches", matches.len()),
        matches: &matches,
        timestamp: Utc::now(),
    })
    .into_response())
}

async fn all_matches(State(state): State<AppState>) -> Result<Response, ApiError> {
    let matches = state.orchestrator.store().all_matches().await?;

    Ok(Json(MatchesResponse {
        status: "success",
        league: None,
        matches: &matches,
        count: matches.len(),
        timestamp: Utc::now(),
    })
    .into_response())
}

async fn matches_by_league(
    State(state): State<AppState>,
    Path(league): Path<String>,
) -> Result<Response, ApiError> {
    let matches = state.orchestrator.store().matches_by_league(&league).await?;

    Ok(Json(MatchesResponse {
        status: "success",
        league: Some(league.as_str()),
        matches: &matches,
        count: matches.len(),
        timestamp: Utc::now(),
    })
    .into_response())
}

/// Export routes address a league by its file-name stem, so labels with
/// spaces or slashes still have a usable URL. Returns the stem with the group.
async fn league_group(
    state: &AppState,
    league: &str,
) -> Result<(String, LeagueGroup), ApiError> {
    let matches = state.orchestrator.store().all_matches().await?;
    let wanted = league_file_stem(league);
    let groups = group_by_league(&matches);
    export_stems(&groups)
        .into_iter()
        .zip(groups)
        .find(|(stem, _)| *stem == wanted)
        .ok_or_else(|| QueryError::NotFound(league.to_string()).into())
}

fn attachment<B: IntoResponse>(name: &str, content_type: &str, body: B) -> Response {
    (
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", name),
            ),
        ],
        body,
    )
        .into_response()
}

async fn export_all_csv(State(state): State<AppState>) -> Result<Response, ApiError> {
    let matches = state.orchestrator.store().all_matches().await?;
    let csv = to_csv(&matches, TableLayout::Consolidated)?;
    let name = consolidated_file_name(Local::now().naive_local(), "csv");
    Ok(attachment(&name, CSV_CONTENT_TYPE, csv))
}

async fn export_all_json(State(state): State<AppState>) -> Result<Response, ApiError> {
    let matches = state.orchestrator.store().all_matches().await?;
    let json = to_json(&matches)?;
    let name = consolidated_file_name(Local::now().naive_local(), "json");
    Ok(attachment(&name, JSON_CONTENT_TYPE, json))
}

async fn export_league_csv(
    State(state): State<AppState>,
    Path(league): Path<String>,
) -> Result<Response, ApiError> {
    let (stem, group) = league_group(&state, &league).await?;
    let csv = to_csv(&group.matches, TableLayout::PerLeague)?;
    let name = league_file_name(&stem, Local::now().naive_local(), "csv");
    Ok(attachment(&name, CSV_CONTENT_TYPE, csv))
}

async fn export_league_json(
    State(state): State<AppState>,
    Path(league): Path<String>,
) -> Result<Response, ApiError> {
    let (stem, group) = league_group(&state, &league).await?;
    let json = to_json(&group.matches)?;
    let name = league_file_name(&stem, Local::now().naive_local(), "json");
    Ok(attachment(&name, JSON_CONTENT_TYPE, json))
}

async fn export_archive(State(state): State<AppState>) -> Result<Response, ApiError> {
    let matches = state.orchestrator.store().all_matches().await?;
    let generated_at = Local::now().naive_local();

    let bytes = tokio::task::spawn_blocking(move || {
        let groups = group_by_league(&matches);
        bundle(&groups, &matches, generated_at)
    })
    .await
    .map_err(|e| ExportError::Io(std::io::Error::other(e)))??;

    Ok(attachment(&archive_name(generated_at), ZIP_CONTENT_TYPE, bytes))
}
