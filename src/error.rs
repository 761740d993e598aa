use thiserror::Error;

use crate::models::Faction;

#[derive(Error, Debug)]
pub enum SeedVipError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Game server API error: {0}")]
    Api(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Invalid {faction} player count condition: min_players ({min}) > max_players ({max})")]
    InvalidCondition {
        faction: Faction,
        min: u32,
        max: u32,
    },

    #[error("Invalid game state: {0}")]
    InvalidGameState(String),
}

pub type Result<T> = std::result::Result<T, SeedVipError>;
