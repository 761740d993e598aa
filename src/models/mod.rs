pub mod condition;
pub mod game;
pub mod vip;

pub use condition::{Faction, PlayerCountCondition, PopulationBounds};
pub use game::{GameState, Player, ServerPopulation};
pub use vip::{VipPlayer, VipStatus};
