//! Player routes: search, profile, server rank badges, round history.

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::{ok, ApiError, OkEnvelope, Pagination, PaginationMeta};
use crate::models::{PlayerProfile, PlayerRound, PlayerSearchHit};
use crate::rating::{self, server_rank_badge, RankStanding, ServerRankBadge, PROVISIONAL_LABEL};

/// Max hits returned by autocomplete.
const SEARCH_CAP: usize = 20;

#[derive(Debug, Deserialize)]
pub struct NameParams {
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RoundsParams {
    pub name: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

fn require_name(name: Option<String>) -> Result<String, ApiError> {
    match name.map(|n| n.trim().to_string()) {
        Some(n) if !n.is_empty() => Ok(n),
        _ => Err(ApiError::BadRequest("name must not be empty".to_string())),
    }
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub players: Vec<PlayerSearchHit>,
}

/// Autocomplete. Prefix matches rank ahead of substring matches; both are
/// capped to keep the dropdown small.
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<NameParams>,
) -> Result<Json<OkEnvelope<SearchResponse>>, ApiError> {
    let name = require_name(params.name)?;
    let needle = name.to_lowercase();

    let mut hits = state.api.search_players(&name).await?;
    hits.sort_by_key(|hit| {
        let lower = hit.name.to_lowercase();
        (!lower.starts_with(&needle), lower)
    });
    hits.truncate(SEARCH_CAP);

    Ok(ok(SearchResponse { players: hits }))
}

#[derive(Debug, Serialize)]
pub struct RankInfo {
    pub label: String,
    pub eligible: bool,
    /// Linear ramp towards a fully weighted rating, 1.0 at 30 ranked rounds
    pub experience_multiplier: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub standing: Option<RankStanding>,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub profile: PlayerProfile,
    pub rank: RankInfo,
}

pub async fn profile(
    State(state): State<AppState>,
    Query(params): Query<NameParams>,
) -> Result<Json<OkEnvelope<ProfileResponse>>, ApiError> {
    let name = require_name(params.name)?;
    let profile = state.api.player_profile(&name).await?;

    let now = chrono::Utc::now();
    let eligible = rating::is_eligible(profile.lifetime.ranked_rounds, profile.last_seen, now);
    let experience_multiplier = rating::experience_multiplier(profile.lifetime.ranked_rounds);

    let rank = match (&profile.rating, eligible) {
        (Some(rating), true) => {
            let standing = rating::standing_for_score(rating.score);
            RankInfo {
                label: standing.label(),
                eligible: true,
                experience_multiplier,
                standing: Some(standing),
            }
        }
        _ => RankInfo {
            label: PROVISIONAL_LABEL.to_string(),
            eligible: false,
            experience_multiplier,
            standing: None,
        },
    };

    Ok(ok(ProfileResponse { profile, rank }))
}

#[derive(Debug, Serialize)]
pub struct ServerRanksResponse {
    pub badges: Vec<ServerRankBadge>,
}

/// Rank badges for every server where the player has 3+ rounds.
pub async fn server_ranks(
    State(state): State<AppState>,
    Query(params): Query<NameParams>,
) -> Result<Json<OkEnvelope<ServerRanksResponse>>, ApiError> {
    let name = require_name(params.name)?;
    // 404s the same way the profile page does for unknown players
    let profile = state.api.player_profile(&name).await?;

    let servers = state.servers().await?;
    let mut badges = Vec::new();
    for server in &servers {
        let totals = state.server_players(server.server_id).await?;
        if let Some(badge) = server_rank_badge(&server.name, &totals, &profile.name) {
            badges.push(badge);
        }
    }
    badges.sort_by_key(|b| b.position);

    Ok(ok(ServerRanksResponse { badges }))
}

#[derive(Debug, Serialize)]
pub struct RoundsResponse {
    pub rounds: Vec<PlayerRound>,
    pub pagination: PaginationMeta,
}

/// Paginated round history, newest first.
pub async fn rounds(
    State(state): State<AppState>,
    Query(params): Query<RoundsParams>,
) -> Result<Json<OkEnvelope<RoundsResponse>>, ApiError> {
    let name = require_name(params.name)?;
    let pagination = Pagination::new(params.page, params.page_size);

    let mut rounds = state.api.player_rounds(&name).await?;
    rounds.sort_by(|a, b| b.start_time.cmp(&a.start_time));

    let meta = PaginationMeta::new(&pagination, rounds.len() as u32);
    let page = pagination.slice(&rounds);

    Ok(ok(RoundsResponse {
        rounds: page,
        pagination: meta,
    }))
}
