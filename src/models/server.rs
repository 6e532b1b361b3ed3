//! Game server model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Live state of a server as of the last poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ServerState {
    Active,
    Empty,
    Offline,
}

impl ServerState {
    /// Directory sort order: active servers first, offline last.
    pub fn sort_order(&self) -> u8 {
        match self {
            ServerState::Active => 1,
            ServerState::Empty => 2,
            ServerState::Offline => 3,
        }
    }
}

impl std::fmt::Display for ServerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServerState::Active => write!(f, "ACTIVE"),
            ServerState::Empty => write!(f, "EMPTY"),
            ServerState::Offline => write!(f, "OFFLINE"),
        }
    }
}

/// A game server with its live state, as returned by `/servers`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerInfo {
    pub server_id: u64,

    /// Current advertised server name
    pub name: String,

    /// "ip:port" join address
    pub address: String,

    /// Map currently being played, if online
    pub current_map: Option<String>,

    pub gamemode: Option<String>,

    pub current_players: u32,
    pub max_players: u32,

    pub current_state: ServerState,

    /// Whether rounds from this server count towards RP
    pub ranked: bool,

    /// Last time the core service saw this server respond
    pub last_seen: DateTime<Utc>,
}

impl ServerInfo {
    pub fn slug(&self) -> String {
        super::slugify(&self.name)
    }

    /// Fill ratio (0.0 to 1.0), guarding against bogus max_players.
    pub fn fill(&self) -> f64 {
        if self.max_players == 0 {
            0.0
        } else {
            self.current_players as f64 / self.max_players as f64
        }
    }
}
