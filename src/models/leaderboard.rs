//! Leaderboard models and ranking windows.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Time window a leaderboard covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Window {
    AllTime,
    Weekly,
    Monthly,
}

impl Window {
    pub fn as_str(&self) -> &'static str {
        match self {
            Window::AllTime => "all_time",
            Window::Weekly => "weekly",
            Window::Monthly => "monthly",
        }
    }
}

impl std::fmt::Display for Window {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of a leaderboard as fetched from the core service, before the
/// hub assigns positions and movement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub player_id: u64,
    pub name: String,

    /// RP score on the 0-2000 scale
    pub score: u32,

    pub kills: u64,
    pub kdr: f64,
    pub rounds: u32,

    pub last_seen: DateTime<Utc>,
}

/// A ranked leaderboard row served by the hub: position assigned, rank
/// label attached, and movement against the previous window when known.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedEntry {
    pub position: u32,

    #[serde(flatten)]
    pub entry: LeaderboardEntry,

    /// Military rank label, e.g. "Captain (CPT)"
    pub rank: String,

    /// Positions gained since the previous window; negative means dropped.
    /// Absent on the all-time board and for new entrants.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub movement: Option<i32>,
}
