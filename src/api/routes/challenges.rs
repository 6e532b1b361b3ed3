//! Community challenge routes.

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::{ok, ApiError, OkEnvelope};
use crate::models::{Challenge, ChallengeHistoryEntry};

const DEFAULT_HISTORY_LIMIT: usize = 10;

#[derive(Debug, Serialize)]
pub struct ChallengeView {
    #[serde(flatten)]
    pub challenge: Challenge,
    pub progress_percent: f64,
    pub completed: bool,
}

#[derive(Debug, Serialize)]
pub struct ActiveResponse {
    pub challenges: Vec<ChallengeView>,
}

pub async fn active(
    State(state): State<AppState>,
) -> Result<Json<OkEnvelope<ActiveResponse>>, ApiError> {
    let challenges = state
        .challenges()
        .await?
        .into_iter()
        .map(|challenge| ChallengeView {
            progress_percent: challenge.progress_percent(),
            completed: challenge.is_complete(),
            challenge,
        })
        .collect();

    Ok(ok(ActiveResponse { challenges }))
}

#[derive(Debug, Deserialize)]
pub struct HistoryParams {
    pub limit: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub history: Vec<ChallengeHistoryEntry>,
}

pub async fn history(
    State(state): State<AppState>,
    Query(params): Query<HistoryParams>,
) -> Result<Json<OkEnvelope<HistoryResponse>>, ApiError> {
    let limit = params.limit.unwrap_or(DEFAULT_HISTORY_LIMIT as u32) as usize;

    let mut history = state.challenge_history().await?;
    history.sort_by(|a, b| b.ended_at.cmp(&a.ended_at));
    history.truncate(limit);

    Ok(ok(HistoryResponse { history }))
}
