//! REST API endpoints.
//!
//! Axum-based HTTP API serving the community site: player profiles,
//! server directory, leaderboards, challenges, digests, and admin
//! moderation. Every response carries the `ok` envelope.

pub mod routes;
pub mod state;

#[cfg(test)]
pub(crate) mod testing;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use thiserror::Error;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::upstream::UpstreamError;
use state::AppState;

/// API error types.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Upstream unavailable: {0}")]
    Upstream(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<UpstreamError> for ApiError {
    fn from(e: UpstreamError) -> Self {
        if e.is_not_found() {
            ApiError::NotFound(e.to_string())
        } else {
            ApiError::Upstream(e.to_string())
        }
    }
}

/// Error response body: `{ ok: false, error: { code, message } }`.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub ok: bool,
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            ApiError::Upstream(_) => (StatusCode::BAD_GATEWAY, "UPSTREAM_UNAVAILABLE"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        let body = ErrorResponse {
            ok: false,
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Success envelope: `{ ok: true, ...body }`.
#[derive(Debug, Serialize)]
pub struct OkEnvelope<T: Serialize> {
    pub ok: bool,
    #[serde(flatten)]
    pub body: T,
}

/// Wrap a response body in the success envelope.
pub fn ok<T: Serialize>(body: T) -> Json<OkEnvelope<T>> {
    Json(OkEnvelope { ok: true, body })
}

/// Pagination parameters.
#[derive(Debug, Clone)]
pub struct Pagination {
    pub page: u32,
    pub page_size: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 50,
        }
    }
}

impl Pagination {
    pub fn new(page: Option<u32>, page_size: Option<u32>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            page_size: page_size.unwrap_or(50).clamp(1, 100),
        }
    }

    pub fn offset(&self) -> u32 {
        (self.page - 1) * self.page_size
    }

    /// Slice one page out of a full result set.
    pub fn slice<T: Clone>(&self, items: &[T]) -> Vec<T> {
        items
            .iter()
            .skip(self.offset() as usize)
            .take(self.page_size as usize)
            .cloned()
            .collect()
    }
}

/// Pagination metadata in responses.
#[derive(Debug, Serialize)]
pub struct PaginationMeta {
    pub page: u32,
    pub page_size: u32,
    pub total_items: u32,
    pub total_pages: u32,
    pub has_next: bool,
    pub has_prev: bool,
}

impl PaginationMeta {
    pub fn new(pagination: &Pagination, total_items: u32) -> Self {
        let total_pages = total_items.div_ceil(pagination.page_size);
        Self {
            page: pagination.page,
            page_size: pagination.page_size,
            total_items,
            total_pages,
            has_next: pagination.page < total_pages,
            has_prev: pagination.page > 1,
        }
    }
}

/// Build the full API router.
pub fn build_router(state: AppState) -> Router {
    let cors = if state.config.server.cors_origin == "*" {
        CorsLayer::new().allow_origin(Any).allow_methods(Any)
    } else {
        match state.config.server.cors_origin.parse::<axum::http::HeaderValue>() {
            Ok(origin) => CorsLayer::new()
                .allow_origin([origin])
                .allow_methods(Any),
            Err(_) => CorsLayer::new().allow_origin(Any).allow_methods(Any),
        }
    };

    Router::new()
        .route("/api/v1/players/search", get(routes::players::search))
        .route(
            "/api/v1/players/search/profile",
            get(routes::players::profile),
        )
        .route(
            "/api/v1/players/search/server_ranks",
            get(routes::players::server_ranks),
        )
        .route("/api/v1/players/search/rounds", get(routes::players::rounds))
        .route("/api/v1/servers", get(routes::servers::directory))
        .route("/api/v1/servers/search", get(routes::servers::detail))
        .route(
            "/api/v1/servers/search/rankings",
            get(routes::servers::rankings),
        )
        .route(
            "/api/v1/servers/search/activity",
            get(routes::servers::activity),
        )
        .route("/api/v1/servers/search/rounds", get(routes::servers::rounds))
        .route("/api/v1/leaderboard", get(routes::leaderboard::all_time))
        .route(
            "/api/v1/leaderboard/weekly",
            get(routes::leaderboard::weekly),
        )
        .route(
            "/api/v1/leaderboard/monthly",
            get(routes::leaderboard::monthly),
        )
        .route("/api/v1/challenges", get(routes::challenges::active))
        .route(
            "/api/v1/challenges/history",
            get(routes::challenges::history),
        )
        .route("/api/v1/news/digests", get(routes::digests::index))
        .route("/api/v1/news/digests/:week", get(routes::digests::by_week))
        .route("/api/v1/reports", get(routes::reports::list))
        .route(
            "/api/v1/reports/:id/review",
            post(routes::reports::review),
        )
        .route("/api/v1/wiki", get(routes::wiki::index))
        .route("/api/v1/wiki/:slug", get(routes::wiki::by_slug))
        .route("/api/v1/ranks", get(routes::meta::ranks))
        .route("/api/v1/status", get(routes::meta::status))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
