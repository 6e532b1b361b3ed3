//! Server activity heatmaps and per-server player rankings.

use chrono::Timelike;
use serde::{Deserialize, Serialize};

use crate::models::{RoundSummary, ServerPlayerTotals};

/// Average player count for one hour of the day (UTC).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HourBucket {
    /// Hour of day, 0-23
    pub hour: u32,
    pub avg_players: f64,
    /// Rounds sampled in this bucket
    pub samples: u32,
}

/// 24-hour activity profile built from round start times.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityHeatmap {
    pub hours: Vec<HourBucket>,

    /// Busiest hour, absent when no rounds were sampled
    pub peak_hour: Option<u32>,
}

/// Aggregate rounds into 24 hourly buckets of average player counts.
pub fn hourly_activity(rounds: &[RoundSummary]) -> ActivityHeatmap {
    let mut totals = [0u64; 24];
    let mut counts = [0u32; 24];

    for round in rounds {
        let hour = round.start_time.hour() as usize;
        totals[hour] += round.player_count as u64;
        counts[hour] += 1;
    }

    let hours: Vec<HourBucket> = (0..24)
        .map(|h| HourBucket {
            hour: h as u32,
            avg_players: if counts[h] == 0 {
                0.0
            } else {
                totals[h] as f64 / counts[h] as f64
            },
            samples: counts[h],
        })
        .collect();

    let peak_hour = hours
        .iter()
        .filter(|b| b.samples > 0)
        .max_by(|a, b| {
            a.avg_players
                .partial_cmp(&b.avg_players)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|b| b.hour);

    ActivityHeatmap { hours, peak_hour }
}

/// Stat a per-server ranking can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ServerStat {
    #[default]
    Score,
    Kills,
    Kdr,
    Rounds,
}

impl std::str::FromStr for ServerStat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "score" => Ok(ServerStat::Score),
            "kills" => Ok(ServerStat::Kills),
            "kdr" => Ok(ServerStat::Kdr),
            "rounds" => Ok(ServerStat::Rounds),
            other => Err(format!("unknown stat: {other}")),
        }
    }
}

/// A positioned row of a per-server ranking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerRankRow {
    pub position: u32,

    #[serde(flatten)]
    pub totals: ServerPlayerTotals,

    pub kdr: f64,
}

/// Sort server player totals by the chosen stat and assign positions.
/// Tie-breaks: chosen stat desc, then score desc, then name asc.
pub fn rank_server_players(mut totals: Vec<ServerPlayerTotals>, stat: ServerStat) -> Vec<ServerRankRow> {
    totals.sort_by(|a, b| {
        let primary = match stat {
            ServerStat::Score => b.score.cmp(&a.score),
            ServerStat::Kills => b.kills.cmp(&a.kills),
            ServerStat::Rounds => b.rounds.cmp(&a.rounds),
            ServerStat::Kdr => b
                .kdr()
                .partial_cmp(&a.kdr())
                .unwrap_or(std::cmp::Ordering::Equal),
        };
        primary
            .then_with(|| b.score.cmp(&a.score))
            .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
    });

    totals
        .into_iter()
        .enumerate()
        .map(|(i, t)| {
            let kdr = t.kdr();
            ServerRankRow {
                position: i as u32 + 1,
                totals: t,
                kdr,
            }
        })
        .collect()
}

/// Rounds a player needs on a server before they get a rank badge there.
pub const BADGE_MIN_ROUNDS: u32 = 3;

/// A player's standing on one server, shown as a badge on their profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerRankBadge {
    pub server_name: String,
    pub position: u32,
    pub player_count: u32,
    pub rounds: u32,
}

/// Find a player's score-ranking badge on one server. Players with fewer
/// than [`BADGE_MIN_ROUNDS`] rounds there get no badge.
pub fn server_rank_badge(
    server_name: &str,
    totals: &[ServerPlayerTotals],
    player_name: &str,
) -> Option<ServerRankBadge> {
    let ranked = rank_server_players(totals.to_vec(), ServerStat::Score);
    let row = ranked
        .iter()
        .find(|r| r.totals.name.eq_ignore_ascii_case(player_name))?;

    if row.totals.rounds < BADGE_MIN_ROUNDS {
        return None;
    }

    Some(ServerRankBadge {
        server_name: server_name.to_string(),
        position: row.position,
        player_count: ranked.len() as u32,
        rounds: row.totals.rounds,
    })
}
