use serde::{Deserialize, Serialize};

use crate::error::{Result, SeedVipError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Faction {
    Allied,
    Axis,
}

impl std::fmt::Display for Faction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Faction::Allied => write!(f, "allied"),
            Faction::Axis => write!(f, "axis"),
        }
    }
}

/// Inclusive player count range for one faction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PopulationBounds {
    pub(crate) min_players: u32,
    pub(crate) max_players: u32,
}

impl PopulationBounds {
    pub fn new(faction: Faction, min_players: u32, max_players: u32) -> Result<Self> {
        if min_players > max_players {
            return Err(SeedVipError::InvalidCondition {
                faction,
                min: min_players,
                max: max_players,
            });
        }

        Ok(Self {
            min_players,
            max_players,
        })
    }

    pub fn min_players(&self) -> u32 {
        self.min_players
    }

    pub fn max_players(&self) -> u32 {
        self.max_players
    }

    pub fn contains(&self, players: u32) -> bool {
        self.min_players <= players && players <= self.max_players
    }
}

/// A single population threshold check against an observed count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlayerCountCondition {
    pub faction: Faction,
    pub bounds: PopulationBounds,
    pub current_players: u32,
}

impl PlayerCountCondition {
    pub fn new(faction: Faction, min_players: u32, max_players: u32, current_players: u32) -> Result<Self> {
        let bounds = PopulationBounds::new(faction, min_players, max_players)?;
        Ok(Self::with_bounds(faction, bounds, current_players))
    }

    pub fn with_bounds(faction: Faction, bounds: PopulationBounds, current_players: u32) -> Self {
        Self {
            faction,
            bounds,
            current_players,
        }
    }

    pub fn is_met(&self) -> bool {
        self.bounds.contains(self.current_players)
    }
}
