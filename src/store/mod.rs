//! In-memory snapshot store.
//!
//! Every dataset the hub serves is a [`Snapshot`] of an upstream response.
//! The store lives behind a `tokio::sync::RwLock` in the application state;
//! the poller writes, request handlers read.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::models::{
    BotReport, Challenge, ChallengeHistoryEntry, LeaderboardEntry, ReportVerdict, RoundSummary,
    ServerInfo, ServerPlayerTotals, WeeklyDigest, Window,
};

/// A cached dataset with its fetch time.
#[derive(Debug, Clone)]
pub struct Snapshot<T> {
    pub data: T,
    pub fetched_at: DateTime<Utc>,
}

impl<T> Snapshot<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            fetched_at: Utc::now(),
        }
    }

    pub fn is_fresh(&self, ttl: Duration) -> bool {
        let age = Utc::now().signed_duration_since(self.fetched_at);
        age.num_seconds() <= ttl.as_secs() as i64
    }

    pub fn age_seconds(&self) -> i64 {
        Utc::now()
            .signed_duration_since(self.fetched_at)
            .num_seconds()
            .max(0)
    }
}

/// Replace a slot only if the incoming snapshot is newer. Poll tasks can
/// finish out of order; a late result must never clobber a fresher one.
fn replace_if_newer<T>(slot: &mut Option<Snapshot<T>>, incoming: Snapshot<T>) -> bool {
    match slot {
        Some(existing) if existing.fetched_at >= incoming.fetched_at => false,
        _ => {
            *slot = Some(incoming);
            true
        }
    }
}

/// One admin review action, kept for the status endpoint and debugging.
#[derive(Debug, Clone, Serialize)]
pub struct AuditEntry {
    pub id: Uuid,
    pub at: DateTime<Utc>,
    pub report_id: u64,
    pub verdict: ReportVerdict,
    pub reviewer: String,
}

/// All cached datasets.
#[derive(Default)]
pub struct HubStore {
    servers: Option<Snapshot<Vec<ServerInfo>>>,
    leaderboards: HashMap<(Window, u32), Snapshot<Vec<LeaderboardEntry>>>,
    challenges: Option<Snapshot<Vec<Challenge>>>,
    challenge_history: Option<Snapshot<Vec<ChallengeHistoryEntry>>>,
    reports: Option<Snapshot<Vec<BotReport>>>,
    digest_weeks: Option<Snapshot<Vec<String>>>,
    digests: HashMap<String, Snapshot<WeeklyDigest>>,
    server_rounds: HashMap<u64, Snapshot<Vec<RoundSummary>>>,
    server_players: HashMap<u64, Snapshot<Vec<ServerPlayerTotals>>>,

    audit_log: Vec<AuditEntry>,

    last_poll_ok: Option<DateTime<Utc>>,
    last_poll_error: Option<String>,
}

impl HubStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn servers(&self) -> Option<&Snapshot<Vec<ServerInfo>>> {
        self.servers.as_ref()
    }

    pub fn set_servers(&mut self, snapshot: Snapshot<Vec<ServerInfo>>) -> bool {
        replace_if_newer(&mut self.servers, snapshot)
    }

    pub fn leaderboard(&self, window: Window, offset: u32) -> Option<&Snapshot<Vec<LeaderboardEntry>>> {
        self.leaderboards.get(&(window, offset))
    }

    pub fn set_leaderboard(
        &mut self,
        window: Window,
        offset: u32,
        snapshot: Snapshot<Vec<LeaderboardEntry>>,
    ) {
        match self.leaderboards.get(&(window, offset)) {
            Some(existing) if existing.fetched_at >= snapshot.fetched_at => {}
            _ => {
                self.leaderboards.insert((window, offset), snapshot);
            }
        }
    }

    pub fn challenges(&self) -> Option<&Snapshot<Vec<Challenge>>> {
        self.challenges.as_ref()
    }

    pub fn set_challenges(&mut self, snapshot: Snapshot<Vec<Challenge>>) -> bool {
        replace_if_newer(&mut self.challenges, snapshot)
    }

    pub fn challenge_history(&self) -> Option<&Snapshot<Vec<ChallengeHistoryEntry>>> {
        self.challenge_history.as_ref()
    }

    pub fn set_challenge_history(&mut self, snapshot: Snapshot<Vec<ChallengeHistoryEntry>>) -> bool {
        replace_if_newer(&mut self.challenge_history, snapshot)
    }

    pub fn reports(&self) -> Option<&Snapshot<Vec<BotReport>>> {
        self.reports.as_ref()
    }

    pub fn set_reports(&mut self, snapshot: Snapshot<Vec<BotReport>>) -> bool {
        replace_if_newer(&mut self.reports, snapshot)
    }

    /// Apply a reviewed report to the cached list in place, so the change is
    /// visible immediately without waiting for the next refresh.
    pub fn apply_reviewed_report(&mut self, reviewed: BotReport) {
        if let Some(snapshot) = self.reports.as_mut() {
            if let Some(existing) = snapshot
                .data
                .iter_mut()
                .find(|r| r.report_id == reviewed.report_id)
            {
                *existing = reviewed;
            }
        }
    }

    pub fn digest_weeks(&self) -> Option<&Snapshot<Vec<String>>> {
        self.digest_weeks.as_ref()
    }

    pub fn set_digest_weeks(&mut self, snapshot: Snapshot<Vec<String>>) -> bool {
        replace_if_newer(&mut self.digest_weeks, snapshot)
    }

    pub fn digest(&self, week: &str) -> Option<&Snapshot<WeeklyDigest>> {
        self.digests.get(week)
    }

    pub fn set_digest(&mut self, week: String, snapshot: Snapshot<WeeklyDigest>) {
        self.digests.insert(week, snapshot);
    }

    pub fn server_rounds(&self, server_id: u64) -> Option<&Snapshot<Vec<RoundSummary>>> {
        self.server_rounds.get(&server_id)
    }

    pub fn set_server_rounds(&mut self, server_id: u64, snapshot: Snapshot<Vec<RoundSummary>>) {
        self.server_rounds.insert(server_id, snapshot);
    }

    pub fn server_players(&self, server_id: u64) -> Option<&Snapshot<Vec<ServerPlayerTotals>>> {
        self.server_players.get(&server_id)
    }

    pub fn set_server_players(
        &mut self,
        server_id: u64,
        snapshot: Snapshot<Vec<ServerPlayerTotals>>,
    ) {
        self.server_players.insert(server_id, snapshot);
    }

    pub fn record_review(&mut self, report_id: u64, verdict: ReportVerdict, reviewer: String) {
        self.audit_log.push(AuditEntry {
            id: Uuid::new_v4(),
            at: Utc::now(),
            report_id,
            verdict,
            reviewer,
        });
    }

    pub fn audit_log(&self) -> &[AuditEntry] {
        &self.audit_log
    }

    pub fn record_poll_ok(&mut self) {
        self.last_poll_ok = Some(Utc::now());
        self.last_poll_error = None;
    }

    pub fn record_poll_error(&mut self, error: String) {
        self.last_poll_error = Some(error);
    }

    pub fn last_poll_ok(&self) -> Option<DateTime<Utc>> {
        self.last_poll_ok
    }

    pub fn last_poll_error(&self) -> Option<&str> {
        self.last_poll_error.as_deref()
    }
}
