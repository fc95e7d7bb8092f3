//! Route handlers
//!
//! Handlers only translate between HTTP and the query service; status codes
//! come from the `IntoResponse` impl on [`UdbError`].

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::catalog::{ApplicationRecord, Platform};
use crate::error::{Result, UdbError};

/// Search response body
#[derive(Debug, Serialize)]
pub struct SearchResults {
    pub results: Vec<ApplicationRecord>,
}

/// Stats response body
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    /// Resident memory in MiB, two decimals
    pub memory: Option<String>,
    pub cached_applications: usize,
    pub last_update: String,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Readiness check response
#[derive(Debug, Serialize)]
pub struct ReadyResponse {
    pub ready: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Query string for routes taking a system filter and a limit
#[derive(Debug, Default, Deserialize)]
pub struct FilterParams {
    pub system: Option<String>,
    pub limit: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SystemParams {
    pub system: Option<String>,
}

fn parse_system(system: Option<&str>) -> Result<Option<Platform>> {
    system.map(str::parse::<Platform>).transpose()
}

pub async fn search(
    State(state): State<AppState>,
    Path(application): Path<String>,
    Query(params): Query<FilterParams>,
) -> Result<Json<SearchResults>> {
    let platform = parse_system(params.system.as_deref())?;
    // A missing or zero limit falls back to the configured default.
    let limit = params
        .limit
        .filter(|l| *l > 0)
        .unwrap_or(state.search_limit);
    let results = state.queries.search(&application, platform, Some(limit))?;
    Ok(Json(SearchResults { results }))
}

pub async fn search_v0(
    State(state): State<AppState>,
    Path(application): Path<String>,
) -> Result<Json<SearchResults>> {
    let results = state.queries.search_unranked(&application)?;
    Ok(Json(SearchResults { results }))
}

pub async fn get_app(
    State(state): State<AppState>,
    Path(application): Path<String>,
) -> Result<Json<ApplicationRecord>> {
    Ok(Json(state.queries.exact_get(&application)?))
}

pub async fn random(
    State(state): State<AppState>,
    Query(params): Query<FilterParams>,
) -> Result<Json<Vec<ApplicationRecord>>> {
    let platform = parse_system(params.system.as_deref())?;
    // A missing or zero limit means one record.
    let limit = params.limit.filter(|l| *l > 0).unwrap_or(1);
    Ok(Json(state.queries.random_sample(limit, platform)?))
}

pub async fn all(
    State(state): State<AppState>,
    Query(params): Query<SystemParams>,
) -> Result<Json<Vec<ApplicationRecord>>> {
    let platform = parse_system(params.system.as_deref())?;
    Ok(Json(state.queries.list_all(platform)?))
}

pub async fn stats(State(state): State<AppState>) -> Result<Json<StatsResponse>> {
    let stats = state.queries.stats()?;
    Ok(Json(StatsResponse {
        memory: stats.memory_mib.map(|mib| format!("{mib:.2}")),
        cached_applications: stats.record_count,
        last_update: stats.last_refresh.to_rfc3339(),
    }))
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

pub async fn ready(State(state): State<AppState>) -> (StatusCode, Json<ReadyResponse>) {
    if state.queries.is_ready() {
        (
            StatusCode::OK,
            Json(ReadyResponse {
                ready: true,
                message: None,
            }),
        )
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ReadyResponse {
                ready: false,
                message: Some(UdbError::Uninitialized.to_string()),
            }),
        )
    }
}
