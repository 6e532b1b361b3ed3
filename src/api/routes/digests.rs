//! Weekly SITREP digest routes.

use std::sync::OnceLock;

use axum::extract::{Path, State};
use axum::Json;
use regex::Regex;
use serde::Serialize;

use crate::api::state::AppState;
use crate::api::{ok, ApiError, OkEnvelope};
use crate::models::WeeklyDigest;

fn week_id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\d{4}-W\d{2}$").expect("valid regex"))
}

#[derive(Debug, Serialize)]
pub struct IndexResponse {
    pub weeks: Vec<String>,
}

/// Available digest weeks, newest first.
pub async fn index(
    State(state): State<AppState>,
) -> Result<Json<OkEnvelope<IndexResponse>>, ApiError> {
    let mut weeks = state.digest_weeks().await?;
    weeks.sort_by(|a, b| b.cmp(a));
    Ok(ok(IndexResponse { weeks }))
}

#[derive(Debug, Serialize)]
pub struct DigestResponse {
    pub digest: WeeklyDigest,
}

pub async fn by_week(
    State(state): State<AppState>,
    Path(week): Path<String>,
) -> Result<Json<OkEnvelope<DigestResponse>>, ApiError> {
    if !week_id_pattern().is_match(&week) {
        return Err(ApiError::BadRequest(format!(
            "invalid week id '{week}', expected YYYY-Www"
        )));
    }

    let digest = state.digest(&week).await?;
    Ok(ok(DigestResponse { digest }))
}

#[cfg(test)]
mod tests {
    use crate::api::build_router;
    use crate::api::testing::*;
    use crate::models::{DigestSummary, WeeklyDigest};
    use axum::http::StatusCode;

    fn router_with(api: StubApi) -> axum::Router {
        build_router(stub_state(api))
    }

    fn digest(week: &str) -> WeeklyDigest {
        WeeklyDigest {
            week: week.to_string(),
            summary: DigestSummary {
                total_rounds: 100,
                unique_players: 50,
                total_kills: 8000,
                total_playtime_hours: 200.0,
                rounds_change_pct: Some(5.0),
                players_change_pct: None,
                kills_change_pct: None,
            },
            top_players: vec![],
            top_maps: vec![],
            gamemode_mix: vec![],
            biggest_round: None,
        }
    }

    #[tokio::test]
    async fn test_index_newest_first() {
        let api = StubApi {
            digest_weeks: vec!["2026-W31".to_string(), "2026-W34".to_string()],
            ..Default::default()
        };
        let (status, json) = get_json(router_with(api), "/api/v1/news/digests").await;

        assert_eq!(status, StatusCode::OK);
        let weeks = json["weeks"].as_array().unwrap();
        assert_eq!(weeks[0], "2026-W34");
    }

    #[tokio::test]
    async fn test_digest_by_week() {
        let api = StubApi {
            digests: vec![digest("2026-W34")],
            ..Default::default()
        };
        let (status, json) =
            get_json(router_with(api), "/api/v1/news/digests/2026-W34").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["digest"]["week"], "2026-W34");
        assert_eq!(json["digest"]["summary"]["total_rounds"], 100);
    }

    #[tokio::test]
    async fn test_invalid_week_id() {
        let (status, json) = get_json(
            router_with(StubApi::default()),
            "/api/v1/news/digests/august",
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn test_unknown_week_is_404() {
        let (status, _) = get_json(
            router_with(StubApi::default()),
            "/api/v1/news/digests/2026-W01",
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
