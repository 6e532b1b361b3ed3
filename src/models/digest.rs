//! Weekly SITREP digest models.

use serde::{Deserialize, Serialize};

/// A weekly activity digest keyed by ISO week id (`YYYY-Www`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklyDigest {
    /// ISO week id, e.g. "2026-W34"
    pub week: String,

    pub summary: DigestSummary,

    /// Top players of the week by score
    pub top_players: Vec<DigestPlayer>,

    /// Most played maps by round count
    pub top_maps: Vec<DigestMap>,

    /// Rounds per gamemode
    pub gamemode_mix: Vec<DigestGamemode>,

    /// Largest round of the week by player count, if any rounds happened
    pub biggest_round: Option<DigestRound>,
}

/// Headline totals with percent change against the previous week.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DigestSummary {
    pub total_rounds: u64,
    pub unique_players: u64,
    pub total_kills: u64,
    pub total_playtime_hours: f64,

    /// Percent changes vs the previous week; absent for the first
    /// recorded week
    pub rounds_change_pct: Option<f64>,
    pub players_change_pct: Option<f64>,
    pub kills_change_pct: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DigestPlayer {
    pub name: String,
    pub score: u64,
    pub kills: u64,
    pub rounds: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DigestMap {
    pub map_name: String,
    pub rounds: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DigestGamemode {
    pub gamemode: String,
    pub rounds: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DigestRound {
    pub round_id: u64,
    pub server_name: String,
    pub map_name: String,
    pub player_count: u32,
    pub total_kills: u64,
}
