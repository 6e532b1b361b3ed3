//! Server routes: directory, detail, rankings, activity, round history.

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::{ok, ApiError, OkEnvelope, Pagination, PaginationMeta};
use crate::models::{RoundSummary, ServerInfo};
use crate::rating::{hourly_activity, rank_server_players, ActivityHeatmap, ServerRankRow, ServerStat};

#[derive(Debug, Deserialize)]
pub struct DirectoryParams {
    /// "status" (default), "players", or "name"
    pub sort: Option<String>,
    /// Substring filter on the server name
    pub filter: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub search: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RankingsParams {
    pub search: Option<String>,
    pub stat: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct RoundsParams {
    pub search: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

fn require_search(search: Option<String>) -> Result<String, ApiError> {
    match search.map(|s| s.trim().to_string()) {
        Some(s) if !s.is_empty() => Ok(s),
        _ => Err(ApiError::BadRequest("search must not be empty".to_string())),
    }
}

#[derive(Debug, Serialize)]
pub struct DirectoryResponse {
    pub servers: Vec<ServerInfo>,
    pub pagination: PaginationMeta,
}

/// Server directory. Default sort puts active servers first, fuller servers
/// ahead within the same state.
pub async fn directory(
    State(state): State<AppState>,
    Query(params): Query<DirectoryParams>,
) -> Result<Json<OkEnvelope<DirectoryResponse>>, ApiError> {
    let pagination = Pagination::new(params.page, params.page_size);
    let mut servers = state.servers().await?;

    if let Some(filter) = params.filter.as_deref() {
        let needle = filter.to_lowercase();
        servers.retain(|s| s.name.to_lowercase().contains(&needle));
    }

    match params.sort.as_deref().unwrap_or("status") {
        "players" => servers.sort_by(|a, b| b.current_players.cmp(&a.current_players)),
        "name" => servers.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase())),
        _ => servers.sort_by(|a, b| {
            a.current_state
                .sort_order()
                .cmp(&b.current_state.sort_order())
                .then_with(|| b.current_players.cmp(&a.current_players))
                .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        }),
    }

    let meta = PaginationMeta::new(&pagination, servers.len() as u32);
    let page = pagination.slice(&servers);

    Ok(ok(DirectoryResponse {
        servers: page,
        pagination: meta,
    }))
}

#[derive(Debug, Serialize)]
pub struct DetailResponse {
    pub server: ServerInfo,
}

pub async fn detail(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<OkEnvelope<DetailResponse>>, ApiError> {
    let search = require_search(params.search)?;
    let server = state.find_server(&search).await?;
    Ok(ok(DetailResponse { server }))
}

#[derive(Debug, Serialize)]
pub struct RankingsResponse {
    pub server: String,
    pub stat: ServerStat,
    pub rankings: Vec<ServerRankRow>,
    pub pagination: PaginationMeta,
}

pub async fn rankings(
    State(state): State<AppState>,
    Query(params): Query<RankingsParams>,
) -> Result<Json<OkEnvelope<RankingsResponse>>, ApiError> {
    let search = require_search(params.search)?;
    let stat = match params.stat.as_deref() {
        None => ServerStat::default(),
        Some(s) => s.parse().map_err(ApiError::BadRequest)?,
    };
    let pagination = Pagination::new(params.page, params.page_size);

    let server = state.find_server(&search).await?;
    let totals = state.server_players(server.server_id).await?;
    let rows = rank_server_players(totals, stat);

    let meta = PaginationMeta::new(&pagination, rows.len() as u32);
    let page = pagination.slice(&rows);

    Ok(ok(RankingsResponse {
        server: server.name,
        stat,
        rankings: page,
        pagination: meta,
    }))
}

#[derive(Debug, Serialize)]
pub struct ActivityResponse {
    pub server: String,
    #[serde(flatten)]
    pub heatmap: ActivityHeatmap,
}

/// 24h activity heatmap built from the server's recent rounds.
pub async fn activity(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<OkEnvelope<ActivityResponse>>, ApiError> {
    let search = require_search(params.search)?;
    let server = state.find_server(&search).await?;
    let rounds = state.server_rounds(server.server_id).await?;

    Ok(ok(ActivityResponse {
        server: server.name,
        heatmap: hourly_activity(&rounds),
    }))
}

#[derive(Debug, Serialize)]
pub struct RoundsResponse {
    pub server: String,
    pub rounds: Vec<RoundSummaryView>,
    pub pagination: PaginationMeta,
}

/// Round row with the ranked verdict spelled out for the UI.
#[derive(Debug, Serialize)]
pub struct RoundSummaryView {
    #[serde(flatten)]
    pub round: RoundSummary,
    pub ranked: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unranked_reason: Option<String>,
}

pub async fn rounds(
    State(state): State<AppState>,
    Query(params): Query<RoundsParams>,
) -> Result<Json<OkEnvelope<RoundsResponse>>, ApiError> {
    let search = require_search(params.search)?;
    let pagination = Pagination::new(params.page, params.page_size);

    let server = state.find_server(&search).await?;
    let mut rounds = state.server_rounds(server.server_id).await?;
    rounds.sort_by(|a, b| b.start_time.cmp(&a.start_time));

    let meta = PaginationMeta::new(&pagination, rounds.len() as u32);
    let page = pagination
        .slice(&rounds)
        .into_iter()
        .map(|round| {
            let reason = round.unranked_reason();
            RoundSummaryView {
                ranked: reason.is_none(),
                unranked_reason: reason.map(|r| r.describe().to_string()),
                round,
            }
        })
        .collect();

    Ok(ok(RoundsResponse {
        server: server.name,
        rounds: page,
        pagination: meta,
    }))
}
