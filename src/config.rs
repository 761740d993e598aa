use serde::Deserialize;

use crate::{
    error::{Result, SeedVipError},
    models::{Faction, GameState, PlayerCountCondition, PopulationBounds},
};

pub const DEFAULT_CONFIG_PATH: &str = "config/default";

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub api: ApiConfig,
    pub seeding: SeedingConfig,
    pub reward: RewardConfig,
    pub discord: Option<DiscordConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SeedingConfig {
    pub min_allies: u32,
    pub max_allies: u32,
    pub min_axis: u32,
    pub max_axis: u32,
    pub minimum_play_time_minutes: u64,
    pub online_when_seeded: bool,
    pub poll_time_seeding_secs: u64,
    pub poll_time_seeded_secs: u64,
    #[serde(default)]
    pub seeding_player_buckets: Vec<u32>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RewardConfig {
    pub vip_reward_hours: u64,
    pub cumulative_vip: bool,
    #[serde(default)]
    pub forward: bool,
    #[serde(default)]
    pub dry_run: bool,
    pub player_name_not_current_vip: String,
    pub message_reward: String,
    pub message_non_vip: String,
    #[serde(default = "default_true")]
    pub nice_time_delta: bool,
    #[serde(default = "default_true")]
    pub nice_expiration_date: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DiscordConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub webhooks: Vec<String>,
    pub seeding_in_progress_message: String,
    pub seeding_complete_message: String,
    pub player_count_message: String,
}

fn default_true() -> bool {
    true
}

fn default_request_timeout_secs() -> u64 {
    10
}

/// Validated, read-only settings handed to the seeding engine and monitor
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub allies: PopulationBounds,
    pub axis: PopulationBounds,
    pub minimum_play_time: chrono::Duration,
    pub online_when_seeded: bool,
    pub cumulative_vip: bool,
    pub vip_reward: chrono::Duration,

    pub dry_run: bool,
    pub poll_time_seeding: std::time::Duration,
    pub poll_time_seeded: std::time::Duration,
    pub seeding_player_buckets: Vec<u32>,
    pub forward: bool,
    pub player_name_not_current_vip: String,
    pub message_reward: String,
    pub message_non_vip: String,
    pub nice_time_delta: bool,
    pub nice_expiration_date: bool,
}

impl Config {
    /// Load from `path` (any format the `config` crate understands), then
    /// `SEED_VIP_*` environment overrides, e.g. `SEED_VIP_REWARD__DRY_RUN=true`
    pub fn load(path: &str) -> anyhow::Result<Self> {
        dotenv::dotenv().ok();

        let config = config::Config::builder()
            .add_source(config::File::with_name(path))
            .add_source(
                config::Environment::with_prefix("SEED_VIP")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        Ok(config.try_deserialize()?)
    }

    pub fn server_config(&self) -> Result<ServerConfig> {
        ServerConfig::new(&self.seeding, &self.reward)
    }
}

impl ServerConfig {
    pub fn new(seeding: &SeedingConfig, reward: &RewardConfig) -> Result<Self> {
        let allies = PopulationBounds::new(Faction::Allied, seeding.min_allies, seeding.max_allies)?;
        let axis = PopulationBounds::new(Faction::Axis, seeding.min_axis, seeding.max_axis)?;

        if seeding.poll_time_seeding_secs == 0 || seeding.poll_time_seeded_secs == 0 {
            return Err(SeedVipError::Config("poll intervals must be at least one second".to_string()));
        }

        if reward.vip_reward_hours == 0 {
            return Err(SeedVipError::Config("vip_reward_hours must be positive".to_string()));
        }

        let minimum_play_time = i64::try_from(seeding.minimum_play_time_minutes)
            .ok()
            .and_then(chrono::Duration::try_minutes)
            .ok_or_else(|| SeedVipError::Config("minimum_play_time_minutes is out of range".to_string()))?;

        let vip_reward = i64::try_from(reward.vip_reward_hours)
            .ok()
            .and_then(chrono::Duration::try_hours)
            .ok_or_else(|| SeedVipError::Config("vip_reward_hours is out of range".to_string()))?;

        let mut seeding_player_buckets = seeding.seeding_player_buckets.clone();
        seeding_player_buckets.sort_unstable();
        seeding_player_buckets.dedup();

        Ok(Self {
            allies,
            axis,
            minimum_play_time,
            online_when_seeded: seeding.online_when_seeded,
            cumulative_vip: reward.cumulative_vip,
            vip_reward,
            dry_run: reward.dry_run,
            poll_time_seeding: std::time::Duration::from_secs(seeding.poll_time_seeding_secs),
            poll_time_seeded: std::time::Duration::from_secs(seeding.poll_time_seeded_secs),
            seeding_player_buckets,
            forward: reward.forward,
            player_name_not_current_vip: reward.player_name_not_current_vip.clone(),
            message_reward: reward.message_reward.clone(),
            message_non_vip: reward.message_non_vip.clone(),
            nice_time_delta: reward.nice_time_delta,
            nice_expiration_date: reward.nice_expiration_date,
        })
    }

    /// The allied and axis checks for `gamestate`, in that order
    pub fn seeding_conditions(&self, gamestate: &GameState) -> Vec<PlayerCountCondition> {
        vec![
            PlayerCountCondition::with_bounds(Faction::Allied, self.allies, gamestate.num_allied_players),
            PlayerCountCondition::with_bounds(Faction::Axis, self.axis, gamestate.num_axis_players),
        ]
    }

    /// Both factions are past their seeding maximum
    pub fn is_seeded(&self, gamestate: &GameState) -> bool {
        gamestate.num_allied_players > self.allies.max_players()
            && gamestate.num_axis_players > self.axis.max_players()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            allies: PopulationBounds { min_players: 1, max_players: 20 },
            axis: PopulationBounds { min_players: 1, max_players: 20 },
            minimum_play_time: chrono::Duration::minutes(5),
            online_when_seeded: false,
            cumulative_vip: false,
            vip_reward: chrono::Duration::hours(24),
            dry_run: true,
            poll_time_seeding: std::time::Duration::from_secs(60),
            poll_time_seeded: std::time::Duration::from_secs(300),
            seeding_player_buckets: vec![10, 20, 30],
            forward: true,
            player_name_not_current_vip: "{player_name} - Seed VIP".to_string(),
            message_reward: "You earned {vip_reward} of VIP, expires {vip_expiration}".to_string(),
            message_non_vip: "Stay until the server is live to earn VIP".to_string(),
            nice_time_delta: true,
            nice_expiration_date: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeding() -> SeedingConfig {
        SeedingConfig {
            min_allies: 5,
            max_allies: 25,
            min_axis: 5,
            max_axis: 25,
            minimum_play_time_minutes: 5,
            online_when_seeded: false,
            poll_time_seeding_secs: 60,
            poll_time_seeded_secs: 300,
            seeding_player_buckets: vec![30, 10, 20, 10],
        }
    }

    fn reward() -> RewardConfig {
        RewardConfig {
            vip_reward_hours: 24,
            cumulative_vip: true,
            forward: false,
            dry_run: false,
            player_name_not_current_vip: "{player_name} - Seed VIP".to_string(),
            message_reward: "reward".to_string(),
            message_non_vip: "non vip".to_string(),
            nice_time_delta: true,
            nice_expiration_date: true,
        }
    }

    #[test]
    fn test_server_config_conversion() {
        let config = ServerConfig::new(&seeding(), &reward()).unwrap();

        assert_eq!(config.allies.min_players(), 5);
        assert_eq!(config.axis.max_players(), 25);
        assert_eq!(config.minimum_play_time, chrono::Duration::minutes(5));
        assert_eq!(config.vip_reward, chrono::Duration::hours(24));
        assert!(config.cumulative_vip);
        assert_eq!(config.seeding_player_buckets, vec![10, 20, 30]);
        assert_eq!(config.poll_time_seeded, std::time::Duration::from_secs(300));
    }

    #[test]
    fn test_rejects_inverted_bounds() {
        let mut bad = seeding();
        bad.min_axis = 30;

        let err = ServerConfig::new(&bad, &reward()).unwrap_err();
        assert!(matches!(err, SeedVipError::InvalidCondition { faction: Faction::Axis, .. }));
    }

    #[test]
    fn test_rejects_zero_interval_and_reward() {
        let mut bad = seeding();
        bad.poll_time_seeding_secs = 0;
        assert!(matches!(ServerConfig::new(&bad, &reward()), Err(SeedVipError::Config(_))));

        let mut bad = reward();
        bad.vip_reward_hours = 0;
        assert!(matches!(ServerConfig::new(&seeding(), &bad), Err(SeedVipError::Config(_))));
    }

    #[test]
    fn test_seeding_conditions() {
        let config = ServerConfig::new(&seeding(), &reward()).unwrap();
        let gamestate = GameState {
            raw_time_remaining: "1:00:00".to_string(),
            current_map: "foy_warfare".to_string(),
            num_allied_players: 7,
            num_axis_players: 30,
        };

        let conditions = config.seeding_conditions(&gamestate);
        assert_eq!(conditions.len(), 2);
        assert_eq!(conditions[0].faction, Faction::Allied);
        assert!(conditions[0].is_met());
        assert!(!conditions[1].is_met());
        assert!(!config.is_seeded(&gamestate));
    }

    #[test]
    fn test_is_seeded_requires_both_factions() {
        let config = ServerConfig::new(&seeding(), &reward()).unwrap();
        let mut gamestate = GameState {
            raw_time_remaining: "1:00:00".to_string(),
            current_map: "foy_warfare".to_string(),
            num_allied_players: 26,
            num_axis_players: 26,
        };
        assert!(config.is_seeded(&gamestate));

        gamestate.num_axis_players = 25;
        assert!(!config.is_seeded(&gamestate));
    }

    #[test]
    fn test_load_from_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.toml");
        std::fs::write(
            &path,
            r#"
            [api]
            base_url = "http://localhost:8010/"
            api_key = "secret"

            [seeding]
            min_allies = 1
            max_allies = 20
            min_axis = 1
            max_axis = 20
            minimum_play_time_minutes = 5
            online_when_seeded = true
            poll_time_seeding_secs = 60
            poll_time_seeded_secs = 300

            [reward]
            vip_reward_hours = 48
            cumulative_vip = false
            player_name_not_current_vip = "{player_name} - Seed VIP"
            message_reward = "reward"
            message_non_vip = "non vip"
            "#,
        )
        .unwrap();

        let config = Config::load(path.to_str().unwrap()).unwrap();
        assert_eq!(config.api.request_timeout_secs, 10);
        assert!(config.discord.is_none());
        assert!(config.reward.nice_time_delta);

        let server = config.server_config().unwrap();
        assert!(server.online_when_seeded);
        assert_eq!(server.vip_reward, chrono::Duration::hours(48));
    }
}
