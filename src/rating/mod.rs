//! Skill rating (RP) semantics: derived stats, eligibility, round
//! classification, the rank ladder, and ranking helpers.
//!
//! The core service computes RP scores; this module holds the presentation
//! rules built on top of them.

pub mod activity;
pub mod ladder;

pub use activity::*;
pub use ladder::*;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{LeaderboardEntry, RankedEntry, Window};

/// RP component weights. Must sum to 1.0.
pub const WEIGHT_OBJECTIVE: f64 = 0.30;
pub const WEIGHT_KDR: f64 = 0.25;
pub const WEIGHT_KPM: f64 = 0.20;
pub const WEIGHT_WIN: f64 = 0.10;
pub const WEIGHT_VARIETY: f64 = 0.10;
pub const WEIGHT_SCORE_PER_ROUND: f64 = 0.05;

/// Ranked rounds required before a player gets a real rank label.
pub const MIN_RANKED_ROUNDS: u32 = 3;

/// Days of inactivity after which a player drops back to Provisional.
pub const ACTIVITY_WINDOW_DAYS: i64 = 60;

/// Ranked rounds at which the experience multiplier reaches 1.0.
pub const EXPERIENCE_CAP_ROUNDS: u32 = 30;

/// RP component weights as one table, served alongside the rank ladder so
/// the UI can scale breakdown bars.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct RatingWeights {
    pub objective: f64,
    pub kdr: f64,
    pub kpm: f64,
    pub win: f64,
    pub variety: f64,
    pub score_per_round: f64,
}

pub const fn weights() -> RatingWeights {
    RatingWeights {
        objective: WEIGHT_OBJECTIVE,
        kdr: WEIGHT_KDR,
        kpm: WEIGHT_KPM,
        win: WEIGHT_WIN,
        variety: WEIGHT_VARIETY,
        score_per_round: WEIGHT_SCORE_PER_ROUND,
    }
}

/// Kill/death ratio. Zero deaths count as one, matching the scoreboard.
pub fn kdr(kills: u64, deaths: u64) -> f64 {
    kills as f64 / deaths.max(1) as f64
}

/// Kills per minute. Zero playtime yields zero rather than a division blowup.
pub fn kpm(kills: u64, minutes: u64) -> f64 {
    if minutes == 0 {
        0.0
    } else {
        kills as f64 / minutes as f64
    }
}

/// Linear ramp from 0.0 at zero rounds to 1.0 at [`EXPERIENCE_CAP_ROUNDS`].
pub fn experience_multiplier(ranked_rounds: u32) -> f64 {
    ranked_rounds.min(EXPERIENCE_CAP_ROUNDS) as f64 / EXPERIENCE_CAP_ROUNDS as f64
}

/// Whether a player qualifies for a rank label instead of "Provisional".
pub fn is_eligible(ranked_rounds: u32, last_seen: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    ranked_rounds >= MIN_RANKED_ROUNDS && (now - last_seen).num_days() < ACTIVITY_WINDOW_DAYS
}

/// Why a round did not count towards RP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnrankedReason {
    Coop,
    TooFewPlayers,
    TooShort,
    NoCombat,
    Flagged,
}

impl UnrankedReason {
    pub fn describe(&self) -> &'static str {
        match self {
            UnrankedReason::Coop => "Co-op rounds are not ranked",
            UnrankedReason::TooFewPlayers => "Fewer than 4 players",
            UnrankedReason::TooShort => "Round shorter than 2 minutes",
            UnrankedReason::NoCombat => "No kills or deaths recorded",
            UnrankedReason::Flagged => "Flagged for bot farming",
        }
    }
}

impl std::fmt::Display for UnrankedReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.describe())
    }
}

/// Classify a round against the ranked-play rules. `None` means ranked.
pub fn classify_round(
    gamemode: &str,
    player_count: u32,
    duration_seconds: i64,
    total_kills: u64,
    total_deaths: u64,
    flagged: bool,
) -> Option<UnrankedReason> {
    if gamemode.eq_ignore_ascii_case("coop") || gamemode.eq_ignore_ascii_case("co-op") {
        return Some(UnrankedReason::Coop);
    }
    if player_count < 4 {
        return Some(UnrankedReason::TooFewPlayers);
    }
    if duration_seconds < 120 {
        return Some(UnrankedReason::TooShort);
    }
    if total_kills == 0 && total_deaths == 0 {
        return Some(UnrankedReason::NoCombat);
    }
    if flagged {
        return Some(UnrankedReason::Flagged);
    }
    None
}

/// Sort and position a leaderboard. Tie-breaks: score desc, then kills desc,
/// then name asc (case-insensitive). Positions are dense 1..=n.
///
/// `previous` is the same board from the prior window; movement is computed
/// as previous position minus current position (positive means climbed).
/// The all-time board never carries movement.
pub fn rank_leaderboard(
    mut entries: Vec<LeaderboardEntry>,
    previous: Option<&[LeaderboardEntry]>,
    window: Window,
    now: DateTime<Utc>,
) -> Vec<RankedEntry> {
    entries.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then_with(|| b.kills.cmp(&a.kills))
            .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
    });

    let previous_positions: std::collections::HashMap<u64, u32> = match previous {
        Some(prev) if window != Window::AllTime => {
            let mut sorted: Vec<&LeaderboardEntry> = prev.iter().collect();
            sorted.sort_by(|a, b| {
                b.score
                    .cmp(&a.score)
                    .then_with(|| b.kills.cmp(&a.kills))
                    .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
            });
            sorted
                .iter()
                .enumerate()
                .map(|(i, e)| (e.player_id, i as u32 + 1))
                .collect()
        }
        _ => Default::default(),
    };

    entries
        .into_iter()
        .enumerate()
        .map(|(i, entry)| {
            let position = i as u32 + 1;
            let rank = if is_eligible(entry.rounds, entry.last_seen, now) {
                ladder::standing_for_score(entry.score).label()
            } else {
                ladder::PROVISIONAL_LABEL.to_string()
            };
            let movement = previous_positions
                .get(&entry.player_id)
                .map(|prev| *prev as i32 - position as i32);
            RankedEntry {
                position,
                entry,
                rank,
                movement,
            }
        })
        .collect()
}
