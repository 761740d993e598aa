use std::collections::HashSet;

use tracing::debug;

use crate::{config::ServerConfig, models::ServerPopulation};

/// How the eligible set behaves between polls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetentionPolicy {
    /// Once a player qualifies they stay eligible, even after disconnecting
    Persistent,
    /// Only players connected at evaluation time are eligible
    OnlineOnly,
}

impl RetentionPolicy {
    pub fn from_config(config: &ServerConfig) -> Self {
        if config.online_when_seeded {
            RetentionPolicy::OnlineOnly
        } else {
            RetentionPolicy::Persistent
        }
    }
}

/// Steam IDs of players whose session playtime meets the configured minimum
pub fn qualifying_steam_ids(config: &ServerConfig, players: &ServerPopulation) -> HashSet<String> {
    let minimum_seconds = config.minimum_play_time.num_seconds().max(0) as u64;

    players
        .players
        .values()
        .filter(|player| player.current_playtime_seconds >= minimum_seconds)
        .map(|player| player.steam_id_64.clone())
        .collect()
}

/// Fold one poll's population into the running eligible set.
///
/// Population gating is the caller's job; this only applies the playtime
/// filter and the retention policy. `cum_steam_ids` is consumed and the
/// updated set returned so the caller keeps ownership between polls.
pub fn collect_steam_ids(
    config: &ServerConfig,
    players: &ServerPopulation,
    cum_steam_ids: HashSet<String>,
) -> HashSet<String> {
    let qualifying = qualifying_steam_ids(config, players);

    match RetentionPolicy::from_config(config) {
        RetentionPolicy::OnlineOnly => {
            debug!(
                "Online-only retention: {} qualifying, {} previously eligible dropped",
                qualifying.len(),
                cum_steam_ids.difference(&qualifying).count()
            );
            qualifying
        }
        RetentionPolicy::Persistent => {
            let mut cum_steam_ids = cum_steam_ids;
            cum_steam_ids.extend(qualifying);
            cum_steam_ids
        }
    }
}
