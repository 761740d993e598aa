use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::game::Player;

/// One row of the server's VIP roster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VipPlayer {
    pub player: Player,
    pub expiration_date: Option<DateTime<Utc>>,
}

/// What a roster row's expiration actually means at a given instant.
///
/// The roster carries no explicit tag telling a seeding reward apart from a
/// manually granted permanent VIP, so this is derived from the expiration alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VipStatus {
    /// No expiration recorded
    None,
    /// Expiration is at or before `now`
    Expired(DateTime<Utc>),
    /// A finite, still-running VIP (what seeding rewards produce)
    Expires(DateTime<Utc>),
    /// Expiration beyond the indefinite horizon
    Indefinite(DateTime<Utc>),
}

impl VipPlayer {
    pub fn new(player: Player, expiration_date: Option<DateTime<Utc>>) -> Self {
        Self {
            player,
            expiration_date,
        }
    }

    pub fn steam_id_64(&self) -> &str {
        &self.player.steam_id_64
    }

    pub fn status(&self, now: DateTime<Utc>) -> VipStatus {
        match self.expiration_date {
            None => VipStatus::None,
            Some(expiration) if expiration <= now => VipStatus::Expired(expiration),
            Some(expiration) if expiration > crate::seeding::indefinite::indefinite_cutoff(now) => {
                VipStatus::Indefinite(expiration)
            }
            Some(expiration) => VipStatus::Expires(expiration),
        }
    }

    /// The expiration if it is still in the future, for stacking rewards onto
    pub fn active_expiration(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.expiration_date.filter(|expiration| *expiration > now)
    }
}

impl std::fmt::Display for VipStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VipStatus::None => write!(f, "no expiration"),
            VipStatus::Expired(at) => write!(f, "expired {}", at.format("%Y-%m-%d %H:%M UTC")),
            VipStatus::Expires(at) => write!(f, "expires {}", at.format("%Y-%m-%d %H:%M UTC")),
            VipStatus::Indefinite(_) => write!(f, "indefinite"),
        }
    }
}
