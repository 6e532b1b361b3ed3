//! Rank ladder and service status routes.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::state::AppState;
use crate::api::{ok, OkEnvelope};
use crate::rating::ladder::{RankTier, LADDER};
use crate::rating::RatingWeights;

#[derive(Debug, Serialize)]
pub struct RankRow {
    #[serde(flatten)]
    pub tier: RankTier,
    pub label: String,
}

#[derive(Debug, Serialize)]
pub struct RanksResponse {
    pub ranks: Vec<RankRow>,
    pub max_score: u32,
    /// RP component weights, for scaling breakdown bars
    pub weights: RatingWeights,
}

/// The full rank ladder, lowest rank first.
pub async fn ranks() -> Json<OkEnvelope<RanksResponse>> {
    let ranks = LADDER
        .iter()
        .map(|tier| RankRow {
            tier: *tier,
            label: tier.label(),
        })
        .collect();
    ok(RanksResponse {
        ranks,
        max_score: crate::rating::ladder::MAX_SCORE,
        weights: crate::rating::weights(),
    })
}

#[derive(Debug, Serialize)]
pub struct SnapshotAge {
    pub dataset: &'static str,
    pub age_seconds: i64,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub version: &'static str,
    pub uptime_seconds: i64,
    /// `None` until the first poll completes, then tracks poll health.
    pub upstream_reachable: Option<bool>,
    pub last_poll_ok: Option<chrono::DateTime<chrono::Utc>>,
    pub last_poll_error: Option<String>,
    pub snapshots: Vec<SnapshotAge>,
    pub reviews_recorded: usize,
}

pub async fn status(State(state): State<AppState>) -> Json<OkEnvelope<StatusResponse>> {
    let store = state.store.read().await;

    let mut snapshots = Vec::new();
    if let Some(s) = store.servers() {
        snapshots.push(SnapshotAge {
            dataset: "servers",
            age_seconds: s.age_seconds(),
        });
    }
    if let Some(s) = store.challenges() {
        snapshots.push(SnapshotAge {
            dataset: "challenges",
            age_seconds: s.age_seconds(),
        });
    }
    if let Some(s) = store.digest_weeks() {
        snapshots.push(SnapshotAge {
            dataset: "digest_weeks",
            age_seconds: s.age_seconds(),
        });
    }

    let uptime = chrono::Utc::now()
        .signed_duration_since(state.started_at)
        .num_seconds();

    let upstream_reachable = if store.last_poll_error().is_some() {
        Some(false)
    } else {
        store.last_poll_ok().map(|_| true)
    };

    ok(StatusResponse {
        version: env!("CARGO_PKG_VERSION"),
        uptime_seconds: uptime,
        upstream_reachable,
        last_poll_ok: store.last_poll_ok(),
        last_poll_error: store.last_poll_error().map(|s| s.to_string()),
        snapshots,
        reviews_recorded: store.audit_log().len(),
    })
}

#[cfg(test)]
mod tests {
    use crate::api::build_router;
    use crate::api::testing::*;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_ranks_table() {
        let app = build_router(stub_state(StubApi::default()));
        let (status, json) = get_json(app, "/api/v1/ranks").await;

        assert_eq!(status, StatusCode::OK);
        let ranks = json["ranks"].as_array().unwrap();
        assert_eq!(ranks.len(), 20);
        assert_eq!(ranks[0]["abbrev"], "PVT");
        assert_eq!(ranks[19]["label"], "General (GEN)");
        assert_eq!(ranks[10]["threshold"], 1099);
        assert_eq!(json["max_score"], 2000);
        assert_eq!(json["weights"]["objective"], 0.3);
        assert_eq!(json["weights"]["kdr"], 0.25);
        assert_eq!(json["weights"]["score_per_round"], 0.05);
    }

    #[tokio::test]
    async fn test_status_unknown_before_first_poll() {
        let app = build_router(stub_state(StubApi::default()));
        let (status, json) = get_json(app, "/api/v1/status").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["ok"], true);
        assert!(json["upstream_reachable"].is_null());
        assert!(json["last_poll_ok"].is_null());
        assert!(json["snapshots"].as_array().unwrap().is_empty());
        assert_eq!(json["reviews_recorded"], 0);
    }

    #[tokio::test]
    async fn test_status_tracks_poll_health() {
        let state = stub_state(StubApi::default());
        state.store.write().await.record_poll_ok();

        let app = build_router(state.clone());
        let (_, json) = get_json(app, "/api/v1/status").await;
        assert_eq!(json["upstream_reachable"], true);
        assert!(json["last_poll_ok"].is_string());

        state
            .store
            .write()
            .await
            .record_poll_error("connection refused".to_string());
        let app = build_router(state);
        let (_, json) = get_json(app, "/api/v1/status").await;
        assert_eq!(json["upstream_reachable"], false);
        assert_eq!(json["last_poll_error"], "connection refused");
    }
}
