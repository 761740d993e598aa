use serde_json::json;
use tracing::{error, info};

use crate::{
    config::{Config, DiscordConfig},
    discord::formatters,
    models::GameState,
};

pub struct DiscordNotifier {
    http_client: reqwest::Client,
    config: DiscordConfig,
}

impl DiscordNotifier {
    pub fn new(config: &Config) -> Option<Self> {
        let discord_config = config.discord.as_ref()?;

        if !discord_config.enabled {
            info!("Discord notifications are disabled in config");
            return None;
        }

        if discord_config.webhooks.is_empty() {
            info!("No Discord webhooks configured for notifications");
            return None;
        }

        info!("Discord notifier initialized for {} webhooks", discord_config.webhooks.len());

        Some(Self {
            http_client: reqwest::Client::new(),
            config: discord_config.clone(),
        })
    }

    /// Player count crossed a configured bucket while seeding
    pub async fn notify_seeding_progress(&self, gamestate: &GameState, bucket: u32) {
        let message = formatters::format_seeding_progress(&self.config, gamestate, bucket);
        self.send_to_all(&message).await;
    }

    pub async fn notify_seeding_complete(&self, gamestate: &GameState, rewarded: usize) {
        let message = formatters::format_seeding_complete(&self.config, gamestate, rewarded);
        self.send_to_all(&message).await;
    }

    pub async fn notify_error(&self, error_msg: &str) {
        let message = format!("⚠️ **Seed VIP error**\n{}", error_msg);
        self.send_to_all(&message).await;
    }

    async fn send_to_all(&self, message: &str) {
        let payload = json!({ "content": message });

        for webhook in &self.config.webhooks {
            let result = self
                .http_client
                .post(webhook)
                .json(&payload)
                .send()
                .await
                .and_then(|response| response.error_for_status());

            if let Err(e) = result {
                error!("Failed to send Discord notification: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ApiConfig, RewardConfig, SeedingConfig};

    fn config(discord: Option<DiscordConfig>) -> Config {
        Config {
            api: ApiConfig {
                base_url: "http://localhost:8010".to_string(),
                api_key: String::new(),
                request_timeout_secs: 10,
            },
            seeding: SeedingConfig {
                min_allies: 1,
                max_allies: 20,
                min_axis: 1,
                max_axis: 20,
                minimum_play_time_minutes: 5,
                online_when_seeded: false,
                poll_time_seeding_secs: 60,
                poll_time_seeded_secs: 300,
                seeding_player_buckets: vec![],
            },
            reward: RewardConfig {
                vip_reward_hours: 24,
                cumulative_vip: false,
                forward: false,
                dry_run: true,
                player_name_not_current_vip: "{player_name}".to_string(),
                message_reward: "reward".to_string(),
                message_non_vip: "non vip".to_string(),
                nice_time_delta: true,
                nice_expiration_date: true,
            },
            discord,
        }
    }

    fn discord(enabled: bool, webhooks: Vec<String>) -> DiscordConfig {
        DiscordConfig {
            enabled,
            webhooks,
            seeding_in_progress_message: "{player_count}".to_string(),
            seeding_complete_message: "live".to_string(),
            player_count_message: "{num_allied_players} - {num_axis_players}".to_string(),
        }
    }

    #[test]
    fn test_notifier_requires_enabled_webhooks() {
        assert!(DiscordNotifier::new(&config(None)).is_none());
        assert!(DiscordNotifier::new(&config(Some(discord(false, vec!["https://x".to_string()])))).is_none());
        assert!(DiscordNotifier::new(&config(Some(discord(true, vec![])))).is_none());
        assert!(DiscordNotifier::new(&config(Some(discord(true, vec!["https://x".to_string()])))).is_some());
    }
}
