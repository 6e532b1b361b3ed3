//! Shared application state and snapshot access helpers.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::api::ApiError;
use crate::config::AppConfig;
use crate::models::{
    BotReport, Challenge, ChallengeHistoryEntry, LeaderboardEntry, RoundSummary, ServerInfo,
    ServerPlayerTotals, WeeklyDigest, Window,
};
use crate::store::{HubStore, Snapshot};
use crate::upstream::StatsApi;

/// Upstream limit used when caching the challenge history list. Request
/// limits are applied against the cached list.
const HISTORY_FETCH_LIMIT: u32 = 50;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub api: Arc<dyn StatsApi>,
    pub store: Arc<RwLock<HubStore>>,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(config: Arc<AppConfig>, api: Arc<dyn StatsApi>) -> Self {
        Self {
            config,
            api,
            store: Arc::new(RwLock::new(HubStore::new())),
            started_at: Utc::now(),
        }
    }

    fn snapshot_ttl(&self) -> Duration {
        Duration::from_secs(self.config.poll.snapshot_ttl_seconds)
    }

    /// Live server list, refreshed on access if the poller has not kept it
    /// fresh.
    pub async fn servers(&self) -> Result<Vec<ServerInfo>, ApiError> {
        let ttl = self.snapshot_ttl();
        {
            let store = self.store.read().await;
            if let Some(snapshot) = store.servers() {
                if snapshot.is_fresh(ttl) {
                    return Ok(snapshot.data.clone());
                }
            }
        }

        let servers = self.api.servers().await?;
        let mut store = self.store.write().await;
        store.set_servers(Snapshot::new(servers.clone()));
        Ok(servers)
    }

    /// Find one server by slug or case-insensitive name.
    pub async fn find_server(&self, search: &str) -> Result<ServerInfo, ApiError> {
        let needle = search.trim();
        if needle.is_empty() {
            return Err(ApiError::BadRequest("search must not be empty".to_string()));
        }

        let servers = self.servers().await?;
        servers
            .into_iter()
            .find(|s| s.slug() == crate::models::slugify(needle) || s.name.eq_ignore_ascii_case(needle))
            .ok_or_else(|| ApiError::NotFound(format!("no server matching '{needle}'")))
    }

    pub async fn leaderboard(
        &self,
        window: Window,
        offset: u32,
    ) -> Result<Vec<LeaderboardEntry>, ApiError> {
        let ttl = self.snapshot_ttl();
        {
            let store = self.store.read().await;
            if let Some(snapshot) = store.leaderboard(window, offset) {
                if snapshot.is_fresh(ttl) {
                    return Ok(snapshot.data.clone());
                }
            }
        }

        let entries = self.api.leaderboard(window, offset).await?;
        let mut store = self.store.write().await;
        store.set_leaderboard(window, offset, Snapshot::new(entries.clone()));
        Ok(entries)
    }

    pub async fn challenges(&self) -> Result<Vec<Challenge>, ApiError> {
        let ttl = self.snapshot_ttl();
        {
            let store = self.store.read().await;
            if let Some(snapshot) = store.challenges() {
                if snapshot.is_fresh(ttl) {
                    return Ok(snapshot.data.clone());
                }
            }
        }

        let challenges = self.api.challenges().await?;
        let mut store = self.store.write().await;
        store.set_challenges(Snapshot::new(challenges.clone()));
        Ok(challenges)
    }

    pub async fn challenge_history(&self) -> Result<Vec<ChallengeHistoryEntry>, ApiError> {
        let ttl = self.snapshot_ttl();
        {
            let store = self.store.read().await;
            if let Some(snapshot) = store.challenge_history() {
                if snapshot.is_fresh(ttl) {
                    return Ok(snapshot.data.clone());
                }
            }
        }

        let history = self.api.challenge_history(HISTORY_FETCH_LIMIT).await?;
        let mut store = self.store.write().await;
        store.set_challenge_history(Snapshot::new(history.clone()));
        Ok(history)
    }

    pub async fn reports(&self) -> Result<Vec<BotReport>, ApiError> {
        let ttl = self.snapshot_ttl();
        {
            let store = self.store.read().await;
            if let Some(snapshot) = store.reports() {
                if snapshot.is_fresh(ttl) {
                    return Ok(snapshot.data.clone());
                }
            }
        }

        let reports = self.api.bot_reports(None).await?;
        let mut store = self.store.write().await;
        store.set_reports(Snapshot::new(reports.clone()));
        Ok(reports)
    }

    pub async fn digest_weeks(&self) -> Result<Vec<String>, ApiError> {
        let ttl = self.snapshot_ttl();
        {
            let store = self.store.read().await;
            if let Some(snapshot) = store.digest_weeks() {
                if snapshot.is_fresh(ttl) {
                    return Ok(snapshot.data.clone());
                }
            }
        }

        let weeks = self.api.digest_weeks().await?;
        let mut store = self.store.write().await;
        store.set_digest_weeks(Snapshot::new(weeks.clone()));
        Ok(weeks)
    }

    pub async fn digest(&self, week: &str) -> Result<WeeklyDigest, ApiError> {
        let ttl = self.snapshot_ttl();
        {
            let store = self.store.read().await;
            if let Some(snapshot) = store.digest(week) {
                if snapshot.is_fresh(ttl) {
                    return Ok(snapshot.data.clone());
                }
            }
        }

        let digest = self.api.digest(week).await?;
        let mut store = self.store.write().await;
        store.set_digest(week.to_string(), Snapshot::new(digest.clone()));
        Ok(digest)
    }

    pub async fn server_rounds(&self, server_id: u64) -> Result<Vec<RoundSummary>, ApiError> {
        let ttl = self.snapshot_ttl();
        {
            let store = self.store.read().await;
            if let Some(snapshot) = store.server_rounds(server_id) {
                if snapshot.is_fresh(ttl) {
                    return Ok(snapshot.data.clone());
                }
            }
        }

        let rounds = self.api.server_rounds(server_id).await?;
        let mut store = self.store.write().await;
        store.set_server_rounds(server_id, Snapshot::new(rounds.clone()));
        Ok(rounds)
    }

    pub async fn server_players(
        &self,
        server_id: u64,
    ) -> Result<Vec<ServerPlayerTotals>, ApiError> {
        let ttl = self.snapshot_ttl();
        {
            let store = self.store.read().await;
            if let Some(snapshot) = store.server_players(server_id) {
                if snapshot.is_fresh(ttl) {
                    return Ok(snapshot.data.clone());
                }
            }
        }

        let players = self.api.server_players(server_id).await?;
        let mut store = self.store.write().await;
        store.set_server_players(server_id, Snapshot::new(players.clone()));
        Ok(players)
    }
}
