use std::collections::HashMap;

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SeedVipError};

/// Snapshot of the server's current match, taken once per poll
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub raw_time_remaining: String,
    pub current_map: String,
    pub num_allied_players: u32,
    pub num_axis_players: u32,
}

impl GameState {
    pub fn total_players(&self) -> u32 {
        self.num_allied_players.saturating_add(self.num_axis_players)
    }

    /// Parse the map clock (`H:MM:SS`) into a duration
    pub fn time_remaining(&self) -> Result<Duration> {
        let invalid = || {
            SeedVipError::InvalidGameState(format!(
                "unparseable time remaining: {:?}",
                self.raw_time_remaining
            ))
        };

        let parts: Vec<&str> = self.raw_time_remaining.trim().split(':').collect();
        if parts.len() != 3 {
            return Err(invalid());
        }

        let mut fields = [0i64; 3];
        for (field, part) in fields.iter_mut().zip(&parts) {
            *field = part.parse::<u32>().map_err(|_| invalid())? as i64;
        }
        let [hours, minutes, seconds] = fields;
        if minutes >= 60 || seconds >= 60 {
            return Err(invalid());
        }

        Ok(Duration::hours(hours) + Duration::minutes(minutes) + Duration::seconds(seconds))
    }
}

/// A connected player as seen by a single poll
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub steam_id_64: String,
    pub name: String,
    pub current_playtime_seconds: u64,
}

/// Everyone connected at poll time, keyed by steam ID
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServerPopulation {
    pub players: HashMap<String, Player>,
}

impl ServerPopulation {
    pub fn new(players: impl IntoIterator<Item = Player>) -> Self {
        Self {
            players: players
                .into_iter()
                .map(|p| (p.steam_id_64.clone(), p))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn get(&self, steam_id_64: &str) -> Option<&Player> {
        self.players.get(steam_id_64)
    }
}
