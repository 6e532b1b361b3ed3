//! Shared test fixtures for route tests.

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{TimeZone, Utc};
use serde_json::Value;
use tower::util::ServiceExt;

use crate::api::state::AppState;
use crate::config::AppConfig;
use crate::models::*;
use crate::upstream::{StatsApi, UpstreamError};

fn not_found() -> UpstreamError {
    UpstreamError::Rejected {
        code: "not_found".to_string(),
        message: "not found".to_string(),
    }
}

/// Canned-data [`StatsApi`] for router tests.
#[derive(Default)]
pub struct StubApi {
    pub players: Vec<PlayerSearchHit>,
    pub profiles: Vec<PlayerProfile>,
    pub player_rounds: Vec<PlayerRound>,
    pub servers: Vec<ServerInfo>,
    pub server_rounds: Vec<RoundSummary>,
    pub server_players: Vec<ServerPlayerTotals>,
    pub boards: Vec<(Window, u32, Vec<LeaderboardEntry>)>,
    pub challenges: Vec<Challenge>,
    pub challenge_history: Vec<ChallengeHistoryEntry>,
    pub reports: Vec<BotReport>,
    pub digest_weeks: Vec<String>,
    pub digests: Vec<WeeklyDigest>,
}

#[async_trait]
impl StatsApi for StubApi {
    async fn search_players(&self, name: &str) -> Result<Vec<PlayerSearchHit>, UpstreamError> {
        let needle = name.to_lowercase();
        Ok(self
            .players
            .iter()
            .filter(|p| p.name.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }

    async fn player_profile(&self, name: &str) -> Result<PlayerProfile, UpstreamError> {
        self.profiles
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
            .cloned()
            .ok_or_else(not_found)
    }

    async fn player_rounds(&self, _name: &str) -> Result<Vec<PlayerRound>, UpstreamError> {
        Ok(self.player_rounds.clone())
    }

    async fn servers(&self) -> Result<Vec<ServerInfo>, UpstreamError> {
        Ok(self.servers.clone())
    }

    async fn server_rounds(&self, _server_id: u64) -> Result<Vec<RoundSummary>, UpstreamError> {
        Ok(self.server_rounds.clone())
    }

    async fn server_players(
        &self,
        _server_id: u64,
    ) -> Result<Vec<ServerPlayerTotals>, UpstreamError> {
        Ok(self.server_players.clone())
    }

    async fn leaderboard(
        &self,
        window: Window,
        offset: u32,
    ) -> Result<Vec<LeaderboardEntry>, UpstreamError> {
        Ok(self
            .boards
            .iter()
            .find(|(w, o, _)| *w == window && *o == offset)
            .map(|(_, _, entries)| entries.clone())
            .unwrap_or_default())
    }

    async fn challenges(&self) -> Result<Vec<Challenge>, UpstreamError> {
        Ok(self.challenges.clone())
    }

    async fn challenge_history(
        &self,
        limit: u32,
    ) -> Result<Vec<ChallengeHistoryEntry>, UpstreamError> {
        Ok(self
            .challenge_history
            .iter()
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn bot_reports(
        &self,
        status: Option<ReportStatus>,
    ) -> Result<Vec<BotReport>, UpstreamError> {
        Ok(self
            .reports
            .iter()
            .filter(|r| status.map_or(true, |s| r.status == s))
            .cloned()
            .collect())
    }

    async fn review_bot_report(
        &self,
        report_id: u64,
        verdict: ReportVerdict,
        reviewer: &str,
    ) -> Result<BotReport, UpstreamError> {
        let mut report = self
            .reports
            .iter()
            .find(|r| r.report_id == report_id)
            .cloned()
            .ok_or_else(not_found)?;
        report.status = verdict.resulting_status();
        report.reviewed_by = Some(reviewer.to_string());
        report.reviewed_at = Some(Utc::now());
        Ok(report)
    }

    async fn digest_weeks(&self) -> Result<Vec<String>, UpstreamError> {
        Ok(self.digest_weeks.clone())
    }

    async fn digest(&self, week: &str) -> Result<WeeklyDigest, UpstreamError> {
        self.digests
            .iter()
            .find(|d| d.week == week)
            .cloned()
            .ok_or_else(not_found)
    }
}

/// AppState over a stub API with default config.
pub fn stub_state(api: StubApi) -> AppState {
    AppState::new(Arc::new(AppConfig::default()), Arc::new(api))
}

/// AppState with an admin token configured.
pub fn stub_state_with_token(api: StubApi, token: &str) -> AppState {
    let mut config = AppConfig::default();
    config.admin_token = Some(token.to_string());
    AppState::new(Arc::new(config), Arc::new(api))
}

pub async fn get_json(app: axum::Router, uri: &str) -> (StatusCode, Value) {
    let resp = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = resp.status();
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

pub async fn post_json(
    app: axum::Router,
    uri: &str,
    body: Value,
    bearer: Option<&str>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = bearer {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let resp = app
        .oneshot(builder.body(Body::from(body.to_string())).unwrap())
        .await
        .unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

pub fn sample_server(id: u64, name: &str, players: u32, state: ServerState) -> ServerInfo {
    ServerInfo {
        server_id: id,
        name: name.to_string(),
        address: format!("192.0.2.{id}:14567"),
        current_map: Some("Wake Island".to_string()),
        gamemode: Some("Conquest".to_string()),
        current_players: players,
        max_players: 64,
        current_state: state,
        ranked: true,
        last_seen: Utc::now(),
    }
}

pub fn sample_profile(name: &str, score: u32, ranked_rounds: u32) -> PlayerProfile {
    PlayerProfile {
        player_id: 1,
        name: name.to_string(),
        country: Some("DE".to_string()),
        first_seen: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        last_seen: Utc::now(),
        lifetime: LifetimeStats {
            total_score: 50_000,
            kills: 900,
            deaths: 450,
            rounds: ranked_rounds + 10,
            ranked_rounds,
            wins: 60,
            losses: 40,
            minutes_played: 1800,
            distinct_maps: 14,
        },
        rating: Some(SkillRating {
            score,
            breakdown: RatingBreakdown::default(),
        }),
    }
}

pub fn sample_entry(id: u64, name: &str, score: u32, kills: u64) -> LeaderboardEntry {
    LeaderboardEntry {
        player_id: id,
        name: name.to_string(),
        score,
        kills,
        kdr: 2.0,
        rounds: 50,
        last_seen: Utc::now(),
    }
}
