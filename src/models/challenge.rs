//! Community challenge models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who a challenge applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChallengeScope {
    /// Everyone's contributions count towards one shared total
    Community,
    /// Tracked per server
    Server,
}

/// A running challenge, e.g. "10,000 knife kills this month".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Challenge {
    pub challenge_id: u64,
    pub title: String,
    pub description: String,

    pub scope: ChallengeScope,

    /// Stat being accumulated, e.g. "knife_kills", "flag_captures"
    pub stat_type: String,

    pub current_value: u64,
    pub target_value: u64,

    /// Human-readable period, e.g. "August 2026"
    pub period: String,

    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,

    /// Current front-runner, if anyone has contributed
    pub leader: Option<String>,
}

impl Challenge {
    /// Completion percentage, clamped to 100.
    pub fn progress_percent(&self) -> f64 {
        if self.target_value == 0 {
            return 100.0;
        }
        (self.current_value as f64 / self.target_value as f64 * 100.0).min(100.0)
    }

    pub fn is_complete(&self) -> bool {
        self.current_value >= self.target_value
    }
}

/// A finished challenge for the history page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChallengeHistoryEntry {
    pub challenge_id: u64,
    pub title: String,
    pub stat_type: String,
    pub target_value: u64,

    /// Final total when the challenge closed
    pub final_value: u64,

    pub period: String,
    pub ended_at: DateTime<Utc>,

    pub completed: bool,

    /// Top contributor, if recorded
    pub winner: Option<String>,
}
