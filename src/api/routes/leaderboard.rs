//! Leaderboard routes: all-time, weekly, and monthly boards.

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::{ok, ApiError, OkEnvelope, Pagination, PaginationMeta};
use crate::models::{RankedEntry, Window};
use crate::rating::rank_leaderboard;

#[derive(Debug, Deserialize)]
pub struct BoardParams {
    /// "score" (default), "kills", "kdr", or "rounds"
    pub sort: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct BoardResponse {
    pub window: Window,
    pub entries: Vec<RankedEntry>,
    pub pagination: PaginationMeta,
}

pub async fn all_time(
    State(state): State<AppState>,
    Query(params): Query<BoardParams>,
) -> Result<Json<OkEnvelope<BoardResponse>>, ApiError> {
    board(state, Window::AllTime, params).await
}

pub async fn weekly(
    State(state): State<AppState>,
    Query(params): Query<BoardParams>,
) -> Result<Json<OkEnvelope<BoardResponse>>, ApiError> {
    board(state, Window::Weekly, params).await
}

pub async fn monthly(
    State(state): State<AppState>,
    Query(params): Query<BoardParams>,
) -> Result<Json<OkEnvelope<BoardResponse>>, ApiError> {
    board(state, Window::Monthly, params).await
}

/// Positions always come from the score ordering; `sort` only reorders the
/// rows shown, so a kills sort still displays each player's real position.
async fn board(
    state: AppState,
    window: Window,
    params: BoardParams,
) -> Result<Json<OkEnvelope<BoardResponse>>, ApiError> {
    let pagination = Pagination::new(params.page, params.page_size);

    let entries = state.leaderboard(window, 0).await?;
    let previous = match window {
        Window::AllTime => None,
        _ => Some(state.leaderboard(window, 1).await?),
    };

    let mut ranked = rank_leaderboard(
        entries,
        previous.as_deref(),
        window,
        chrono::Utc::now(),
    );

    match params.sort.as_deref() {
        None | Some("score") => {}
        Some("kills") => ranked.sort_by(|a, b| b.entry.kills.cmp(&a.entry.kills)),
        Some("kdr") => ranked.sort_by(|a, b| {
            b.entry
                .kdr
                .partial_cmp(&a.entry.kdr)
                .unwrap_or(std::cmp::Ordering::Equal)
        }),
        Some("rounds") => ranked.sort_by(|a, b| b.entry.rounds.cmp(&a.entry.rounds)),
        Some(other) => {
            return Err(ApiError::BadRequest(format!("unknown sort: {other}")));
        }
    }

    let meta = PaginationMeta::new(&pagination, ranked.len() as u32);
    let page = pagination.slice(&ranked);

    Ok(ok(BoardResponse {
        window,
        entries: page,
        pagination: meta,
    }))
}
