//! Player profile model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifetime totals for a player, as reported by the core stats API.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LifetimeStats {
    /// Cumulative career score (Rank Score / XP)
    pub total_score: u64,

    pub kills: u64,
    pub deaths: u64,

    /// All rounds the player appeared in
    pub rounds: u32,

    /// Rounds that counted towards RP
    pub ranked_rounds: u32,

    pub wins: u32,
    pub losses: u32,

    /// Total minutes on ranked servers
    pub minutes_played: u64,

    /// Distinct maps played
    pub distinct_maps: u32,
}

impl LifetimeStats {
    /// Kill/death ratio. Deaths of zero count as one, matching the
    /// scoreboard convention.
    pub fn kdr(&self) -> f64 {
        crate::rating::kdr(self.kills, self.deaths)
    }

    /// Kills per minute across all tracked playtime.
    pub fn kpm(&self) -> f64 {
        crate::rating::kpm(self.kills, self.minutes_played)
    }

    /// Win rate over decided rounds (0.0 to 1.0).
    pub fn win_rate(&self) -> f64 {
        let decided = self.wins + self.losses;
        if decided == 0 {
            0.0
        } else {
            self.wins as f64 / decided as f64
        }
    }
}

/// Per-component contribution to the RP score, already computed by the
/// core service. Values are points on the 0-2000 scale.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RatingBreakdown {
    /// Objective score per round (flag work) contribution
    pub objective: f64,

    /// Kill/death ratio contribution
    pub kdr: f64,

    /// Kills per minute contribution
    pub kpm: f64,

    /// Win rate contribution
    pub win: f64,

    /// Map variety contribution
    pub variety: f64,

    /// Score per round contribution
    pub score_per_round: f64,
}

/// Externally computed skill rating (RP), 0-2000 scale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillRating {
    pub score: u32,
    pub breakdown: RatingBreakdown,
}

/// A player profile as returned by `/players/search/profile`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerProfile {
    pub player_id: u64,

    /// Canonical in-game name
    pub name: String,

    /// ISO country code, if geolocated
    pub country: Option<String>,

    pub first_seen: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,

    pub lifetime: LifetimeStats,

    /// Absent for players the core service has not rated yet
    pub rating: Option<SkillRating>,
}

impl PlayerProfile {
    pub fn slug(&self) -> String {
        super::slugify(&self.name)
    }
}

/// A lightweight search hit for autocomplete.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerSearchHit {
    pub player_id: u64,
    pub name: String,
    pub total_score: u64,
    pub last_seen: DateTime<Utc>,
}

/// Per-server aggregate totals for one player, used for server rankings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerPlayerTotals {
    pub name: String,
    pub score: u64,
    pub kills: u64,
    pub deaths: u64,
    pub rounds: u32,
}

impl ServerPlayerTotals {
    pub fn kdr(&self) -> f64 {
        crate::rating::kdr(self.kills, self.deaths)
    }
}
