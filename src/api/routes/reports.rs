//! Bot report moderation routes.
//!
//! Gated behind the configured admin bearer token. With no token configured
//! the routes answer 404, so a public deployment shows no admin surface.

use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::{ok, ApiError, OkEnvelope, Pagination, PaginationMeta};
use crate::models::{BotReport, ReportStatus, ReportVerdict};

fn require_admin(state: &AppState, headers: &HeaderMap) -> Result<(), ApiError> {
    let expected = state
        .config
        .admin_token
        .as_deref()
        .ok_or_else(|| ApiError::NotFound("not found".to_string()))?;

    let presented = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    match presented {
        Some(token) if token == expected => Ok(()),
        _ => Err(ApiError::Unauthorized("invalid admin token".to_string())),
    }
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub status: Option<ReportStatus>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct ListResponse {
    pub reports: Vec<BotReport>,
    pub pagination: PaginationMeta,
}

pub async fn list(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<ListParams>,
) -> Result<Json<OkEnvelope<ListResponse>>, ApiError> {
    require_admin(&state, &headers)?;
    let pagination = Pagination::new(params.page, params.page_size);

    let mut reports = state.reports().await?;
    if let Some(status) = params.status {
        reports.retain(|r| r.status == status);
    }
    reports.sort_by(|a, b| b.detected_at.cmp(&a.detected_at));

    let meta = PaginationMeta::new(&pagination, reports.len() as u32);
    let page = pagination.slice(&reports);

    Ok(ok(ListResponse {
        reports: page,
        pagination: meta,
    }))
}

#[derive(Debug, Deserialize)]
pub struct ReviewBody {
    pub verdict: ReportVerdict,
    pub reviewer: String,
}

#[derive(Debug, Serialize)]
pub struct ReviewResponse {
    pub report: BotReport,
}

/// Forward a verdict upstream, then patch the cached snapshot so the admin
/// page reflects it immediately.
pub async fn review(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    headers: HeaderMap,
    Json(body): Json<ReviewBody>,
) -> Result<Json<OkEnvelope<ReviewResponse>>, ApiError> {
    require_admin(&state, &headers)?;

    if body.reviewer.trim().is_empty() {
        return Err(ApiError::BadRequest("reviewer must not be empty".to_string()));
    }

    let reviewed = state
        .api
        .review_bot_report(id, body.verdict, &body.reviewer)
        .await?;

    let mut store = state.store.write().await;
    store.apply_reviewed_report(reviewed.clone());
    store.record_review(id, body.verdict, body.reviewer);

    Ok(ok(ReviewResponse { report: reviewed }))
}
