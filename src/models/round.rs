//! Round models: server round history and per-player round results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::rating::{classify_round, UnrankedReason};

/// One finished round on a server, as returned by `/servers/search/rounds`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundSummary {
    pub round_id: u64,
    pub map_name: String,
    pub gamemode: String,

    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,

    /// Tracked human players in the round
    pub player_count: u32,

    pub total_kills: u64,
    pub total_deaths: u64,

    /// Flagged by automated bot-farming detection (admin reviewed)
    #[serde(default)]
    pub flagged: bool,
}

impl RoundSummary {
    pub fn duration_seconds(&self) -> i64 {
        (self.end_time - self.start_time).num_seconds().max(0)
    }

    /// Why this round does not count towards RP, if it doesn't.
    pub fn unranked_reason(&self) -> Option<UnrankedReason> {
        classify_round(
            &self.gamemode,
            self.player_count,
            self.duration_seconds(),
            self.total_kills,
            self.total_deaths,
            self.flagged,
        )
    }

    pub fn is_ranked(&self) -> bool {
        self.unranked_reason().is_none()
    }
}

/// One round from a player's perspective, for round-history pages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerRound {
    pub round_id: u64,
    pub server_name: String,
    pub map_name: String,
    pub gamemode: String,

    pub start_time: DateTime<Utc>,

    pub score: i64,
    pub kills: u32,
    pub deaths: u32,

    /// Whether the player's team won; absent for draws or aborted rounds
    pub team_won: Option<bool>,

    /// Ranked flag as recorded by the core service
    pub ranked: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn round(gamemode: &str, players: u32, mins: i64, kills: u64, flagged: bool) -> RoundSummary {
        let start = Utc.with_ymd_and_hms(2026, 8, 20, 19, 0, 0).unwrap();
        RoundSummary {
            round_id: 1,
            map_name: "El Alamein".to_string(),
            gamemode: gamemode.to_string(),
            start_time: start,
            end_time: start + chrono::Duration::minutes(mins),
            player_count: players,
            total_kills: kills,
            total_deaths: kills,
            flagged,
        }
    }

    #[test]
    fn test_ranked_round() {
        let r = round("Conquest", 12, 20, 140, false);
        assert!(r.is_ranked());
        assert_eq!(r.unranked_reason(), None);
    }

    #[test]
    fn test_coop_is_unranked() {
        let r = round("Coop", 12, 20, 140, false);
        assert_eq!(r.unranked_reason(), Some(UnrankedReason::Coop));
    }

    #[test]
    fn test_short_round_is_unranked() {
        let r = round("Conquest", 12, 1, 10, false);
        assert_eq!(r.unranked_reason(), Some(UnrankedReason::TooShort));
    }

    #[test]
    fn test_duration_never_negative() {
        let start = Utc.with_ymd_and_hms(2026, 8, 20, 19, 0, 0).unwrap();
        let r = RoundSummary {
            round_id: 1,
            map_name: "Bocage".to_string(),
            gamemode: "CTF".to_string(),
            start_time: start,
            end_time: start - chrono::Duration::minutes(5),
            player_count: 8,
            total_kills: 10,
            total_deaths: 10,
            flagged: false,
        };
        assert_eq!(r.duration_seconds(), 0);
    }

    #[test]
    fn test_player_round_deserializes() {
        let json = r#"{
            "round_id": 9911,
            "server_name": "Moongamers 24/7",
            "map_name": "Wake Island",
            "gamemode": "Conquest",
            "start_time": "2026-08-20T19:00:00Z",
            "score": 54,
            "kills": 21,
            "deaths": 9,
            "team_won": true,
            "ranked": true
        }"#;
        let pr: PlayerRound = serde_json::from_str(json).unwrap();
        assert_eq!(pr.kills, 21);
        assert_eq!(pr.team_won, Some(true));
    }
}
