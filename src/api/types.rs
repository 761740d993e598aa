use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    error::{Result, SeedVipError},
    models::{GameState, Player, ServerPopulation, VipPlayer},
};

/// Every API response is wrapped in this envelope
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub result: Option<T>,
    #[serde(default)]
    pub failed: bool,
    #[serde(default)]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn into_result(self, command: &str) -> Result<T> {
        if self.failed {
            return Err(SeedVipError::Api(format!(
                "{} failed: {}",
                command,
                self.error.unwrap_or_else(|| "no error message".to_string())
            )));
        }

        self.result
            .ok_or_else(|| SeedVipError::Api(format!("{} returned no result", command)))
    }
}

/// Older API versions send the map as a plain name, newer ones as a layer object
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum MapField {
    Name(String),
    Layer {
        id: String,
        #[serde(default)]
        pretty_name: Option<String>,
    },
}

impl MapField {
    pub fn name(self) -> String {
        match self {
            MapField::Name(name) => name,
            MapField::Layer { id, pretty_name } => pretty_name.unwrap_or(id),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct GameStateResponse {
    pub raw_time_remaining: String,
    pub current_map: MapField,
    pub num_allied_players: u32,
    pub num_axis_players: u32,
}

impl From<GameStateResponse> for GameState {
    fn from(value: GameStateResponse) -> Self {
        GameState {
            raw_time_remaining: value.raw_time_remaining,
            current_map: value.current_map.name(),
            num_allied_players: value.num_allied_players,
            num_axis_players: value.num_axis_players,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct DetailedPlayer {
    #[serde(alias = "player_id")]
    pub steam_id_64: String,
    pub name: String,
    #[serde(default)]
    pub current_playtime_seconds: u64,
}

#[derive(Debug, Deserialize)]
pub struct DetailedPlayersResponse {
    pub players: HashMap<String, DetailedPlayer>,
}

impl From<DetailedPlayersResponse> for ServerPopulation {
    fn from(value: DetailedPlayersResponse) -> Self {
        ServerPopulation::new(value.players.into_values().map(|p| Player {
            steam_id_64: p.steam_id_64,
            name: p.name,
            current_playtime_seconds: p.current_playtime_seconds,
        }))
    }
}

#[derive(Debug, Deserialize)]
pub struct VipEntry {
    #[serde(alias = "player_id")]
    pub steam_id_64: String,
    pub name: String,
    #[serde(default)]
    pub vip_expiration: Option<DateTime<Utc>>,
}

impl From<VipEntry> for VipPlayer {
    fn from(value: VipEntry) -> Self {
        VipPlayer::new(
            Player {
                steam_id_64: value.steam_id_64,
                name: value.name,
                current_playtime_seconds: 0,
            },
            value.vip_expiration,
        )
    }
}

pub fn vip_roster(entries: Vec<VipEntry>) -> HashMap<String, VipPlayer> {
    entries
        .into_iter()
        .map(|entry| (entry.steam_id_64.clone(), VipPlayer::from(entry)))
        .collect()
}

#[derive(Debug, Serialize)]
pub struct AddVipRequest<'a> {
    pub steam_id_64: &'a str,
    pub description: &'a str,
    pub expiration: DateTime<Utc>,
    pub forward: bool,
}

#[derive(Debug, Serialize)]
pub struct MessagePlayerRequest<'a> {
    pub steam_id_64: &'a str,
    pub message: &'a str,
    pub forward: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gamestate_with_plain_map_name() {
        let response: ApiResponse<GameStateResponse> = serde_json::from_str(
            r#"{
                "result": {
                    "raw_time_remaining": "1:12:45",
                    "current_map": "carentan_warfare",
                    "num_allied_players": 4,
                    "num_axis_players": 6
                },
                "failed": false
            }"#,
        )
        .unwrap();

        let gamestate = GameState::from(response.into_result("get_gamestate").unwrap());
        assert_eq!(gamestate.current_map, "carentan_warfare");
        assert_eq!(gamestate.total_players(), 10);
    }

    #[test]
    fn test_gamestate_with_layer_object() {
        let response: ApiResponse<GameStateResponse> = serde_json::from_str(
            r#"{
                "result": {
                    "raw_time_remaining": "0:30:00",
                    "current_map": {"id": "omahabeach_warfare", "pretty_name": "Omaha Beach Warfare"},
                    "num_allied_players": 0,
                    "num_axis_players": 1
                }
            }"#,
        )
        .unwrap();

        let gamestate = GameState::from(response.into_result("get_gamestate").unwrap());
        assert_eq!(gamestate.current_map, "Omaha Beach Warfare");
    }

    #[test]
    fn test_failed_envelope() {
        let response: ApiResponse<GameStateResponse> =
            serde_json::from_str(r#"{"result": null, "failed": true, "error": "rcon down"}"#).unwrap();

        let err = response.into_result("get_gamestate").unwrap_err();
        assert!(matches!(err, SeedVipError::Api(msg) if msg.contains("rcon down")));
    }

    #[test]
    fn test_detailed_players() {
        let response: ApiResponse<DetailedPlayersResponse> = serde_json::from_str(
            r#"{
                "result": {
                    "players": {
                        "76561198000000001": {"player_id": "76561198000000001", "name": "Able", "current_playtime_seconds": 640},
                        "76561198000000002": {"steam_id_64": "76561198000000002", "name": "Baker"}
                    }
                },
                "failed": false
            }"#,
        )
        .unwrap();

        let population = ServerPopulation::from(response.into_result("get_detailed_players").unwrap());
        assert_eq!(population.len(), 2);
        assert_eq!(population.get("76561198000000001").unwrap().current_playtime_seconds, 640);
        assert_eq!(population.get("76561198000000002").unwrap().current_playtime_seconds, 0);
    }

    #[test]
    fn test_vip_roster() {
        let response: ApiResponse<Vec<VipEntry>> = serde_json::from_str(
            r#"{
                "result": [
                    {"player_id": "1", "name": "Seeder", "vip_expiration": "2024-01-02T03:04:05+00:00"},
                    {"player_id": "2", "name": "Admin", "vip_expiration": "3000-01-01T00:00:00Z"},
                    {"player_id": "3", "name": "Legacy", "vip_expiration": null}
                ],
                "failed": false
            }"#,
        )
        .unwrap();

        let roster = vip_roster(response.into_result("get_vip_ids").unwrap());
        assert_eq!(roster.len(), 3);
        assert_eq!(
            roster["1"].expiration_date,
            Some("2024-01-02T03:04:05Z".parse::<DateTime<Utc>>().unwrap())
        );
        assert!(roster["3"].expiration_date.is_none());
    }
}
