use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::{
    api::GameServer,
    config::ServerConfig,
    discord::DiscordNotifier,
    error::Result,
    models::{GameState, ServerPopulation, VipPlayer, VipStatus},
    seeding::{
        conditions::all_met,
        eligibility::{collect_steam_ids, RetentionPolicy},
        expiration::calc_vip_expiration_timestamp,
        indefinite::filter_indefinite_vip_steam_ids,
    },
    utils::{format_expiration, format_vip_reward, render_template},
};

/// A VIP grant decided at the end of a seeding session
#[derive(Debug, Clone, PartialEq)]
pub struct VipGrant {
    pub steam_id_64: String,
    pub description: String,
    pub expiration: DateTime<Utc>,
    /// False in dry-run mode or when the game server rejected the grant.
    /// Rejected grants stay eligible and are retried on the next seeded poll.
    pub applied: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    /// Population is inside the seeding bounds
    Seeding { eligible: usize },
    /// The server just went from seeding to seeded
    Rewarded { granted: Vec<VipGrant> },
    Idle,
}

/// Drives the poll cycle and owns the state carried between polls
pub struct SeedingMonitor<S: GameServer> {
    server: S,
    config: ServerConfig,
    notifier: Option<DiscordNotifier>,
    is_seeding: bool,
    cum_steam_ids: HashSet<String>,
    player_names: HashMap<String, String>,
    announced_buckets: HashSet<u32>,
    /// Players already messaged or found holding VIP this session
    checked_non_vip: HashSet<String>,
}

impl<S: GameServer> SeedingMonitor<S> {
    pub fn new(server: S, config: ServerConfig, notifier: Option<DiscordNotifier>) -> Self {
        Self {
            server,
            config,
            notifier,
            is_seeding: false,
            cum_steam_ids: HashSet::new(),
            player_names: HashMap::new(),
            announced_buckets: HashSet::new(),
            checked_non_vip: HashSet::new(),
        }
    }

    pub fn server(&self) -> &S {
        &self.server
    }

    pub fn is_seeding(&self) -> bool {
        self.is_seeding
    }

    pub fn eligible_steam_ids(&self) -> &HashSet<String> {
        &self.cum_steam_ids
    }

    pub fn next_poll_interval(&self) -> std::time::Duration {
        if self.is_seeding {
            self.config.poll_time_seeding
        } else {
            self.config.poll_time_seeded
        }
    }

    /// Run one poll cycle. A failed fetch leaves the eligible set untouched.
    pub async fn poll_once(&mut self, now: DateTime<Utc>) -> Result<PollOutcome> {
        let gamestate = self.server.get_gamestate().await?;
        let conditions = self.config.seeding_conditions(&gamestate);

        debug!(
            "Population {} allied / {} axis on {} ({} remaining)",
            gamestate.num_allied_players,
            gamestate.num_axis_players,
            gamestate.current_map,
            gamestate.raw_time_remaining
        );

        if all_met(&conditions) {
            self.collect(&gamestate, now).await
        } else if self.is_seeding && self.config.is_seeded(&gamestate) {
            self.reward(&gamestate, now).await
        } else {
            Ok(PollOutcome::Idle)
        }
    }

    async fn collect(&mut self, gamestate: &GameState, now: DateTime<Utc>) -> Result<PollOutcome> {
        let players = self.server.get_players().await?;

        if !self.is_seeding {
            info!("Server is seeding ({} players)", gamestate.total_players());
            self.is_seeding = true;
        }

        let prior = std::mem::take(&mut self.cum_steam_ids);
        self.cum_steam_ids = collect_steam_ids(&self.config, &players, prior);

        for steam_id_64 in &self.cum_steam_ids {
            if let Some(player) = players.get(steam_id_64) {
                self.player_names.insert(steam_id_64.clone(), player.name.clone());
            }
        }
        self.player_names.retain(|steam_id_64, _| self.cum_steam_ids.contains(steam_id_64));

        info!(
            "Seeding: {} online, {} eligible for reward",
            players.len(),
            self.cum_steam_ids.len()
        );

        if let Some(bucket) = newly_crossed_bucket(
            &self.config.seeding_player_buckets,
            &self.announced_buckets,
            gamestate.total_players(),
        ) {
            self.announced_buckets.extend(
                self.config
                    .seeding_player_buckets
                    .iter()
                    .copied()
                    .filter(|b| *b <= bucket),
            );
            if let Some(notifier) = &self.notifier {
                notifier.notify_seeding_progress(gamestate, bucket).await;
            }
        }

        self.message_non_vips(&players, now).await;

        Ok(PollOutcome::Seeding {
            eligible: self.cum_steam_ids.len(),
        })
    }

    /// Tell connected players without VIP, once per seeding session, that they
    /// can earn it by staying
    async fn message_non_vips(&mut self, players: &ServerPopulation, now: DateTime<Utc>) {
        if self.config.message_non_vip.is_empty() {
            return;
        }

        let pending: Vec<String> = players
            .players
            .keys()
            .filter(|steam_id_64| !self.checked_non_vip.contains(*steam_id_64))
            .cloned()
            .collect();
        if pending.is_empty() {
            return;
        }

        let vips = match self.server.get_vips().await {
            Ok(vips) => vips,
            Err(e) => {
                warn!("Skipping non-VIP messages, failed to fetch VIPs: {}", e);
                return;
            }
        };

        for steam_id_64 in pending {
            let has_vip = vips.get(&steam_id_64).is_some_and(|vip| {
                matches!(vip.status(now), VipStatus::Expires(_) | VipStatus::Indefinite(_))
            });
            if has_vip {
                self.checked_non_vip.insert(steam_id_64);
                continue;
            }

            if self.config.dry_run {
                debug!("DRY RUN: would message non-VIP {}", steam_id_64);
            } else if let Err(e) = self
                .server
                .message_player(&steam_id_64, &self.config.message_non_vip)
                .await
            {
                warn!("Failed to message {}: {}", steam_id_64, e);
                continue;
            }
            self.checked_non_vip.insert(steam_id_64);
        }
    }

    async fn reward(&mut self, gamestate: &GameState, now: DateTime<Utc>) -> Result<PollOutcome> {
        let vips = self.server.get_vips().await?;
        let online = match RetentionPolicy::from_config(&self.config) {
            RetentionPolicy::OnlineOnly => {
                let online = self.server.get_players().await?;
                let before = self.cum_steam_ids.len();
                self.cum_steam_ids.retain(|steam_id_64| online.get(steam_id_64).is_some());
                debug!(
                    "Online-only retention: {} of {} seeders still connected",
                    self.cum_steam_ids.len(),
                    before
                );
                online
            }
            RetentionPolicy::Persistent => match self.server.get_players().await {
                Ok(players) => players,
                Err(e) => {
                    warn!("Failed to fetch online players, reward messages skipped: {}", e);
                    ServerPopulation::default()
                }
            },
        };

        info!(
            "Server is seeded ({} players), rewarding {} seeders",
            gamestate.total_players(),
            self.cum_steam_ids.len()
        );

        let granted = self.decide_grants(&vips, now);
        let mut applied = Vec::with_capacity(granted.len());
        let mut rejected = HashSet::new();

        for mut grant in granted {
            if self.config.dry_run {
                info!(
                    "DRY RUN: would grant VIP to {} ({}) until {}",
                    grant.steam_id_64, grant.description, grant.expiration
                );
            } else {
                match self
                    .server
                    .add_vip(&grant.steam_id_64, &grant.description, grant.expiration)
                    .await
                {
                    Ok(()) => {
                        info!("Granted VIP to {} until {}", grant.steam_id_64, grant.expiration);
                        grant.applied = true;
                    }
                    Err(e) => {
                        warn!("Failed to grant VIP to {}: {}", grant.steam_id_64, e);
                        rejected.insert(grant.steam_id_64.clone());
                    }
                }
            }

            if grant.applied && online.get(&grant.steam_id_64).is_some() {
                self.message_reward(&grant).await;
            }
            applied.push(grant);
        }

        if !rejected.is_empty() {
            warn!("{} grants rejected, retrying on the next seeded poll", rejected.len());
            self.cum_steam_ids = rejected;
            self.player_names.retain(|steam_id_64, _| self.cum_steam_ids.contains(steam_id_64));
            return Ok(PollOutcome::Rewarded { granted: applied });
        }

        if let Some(notifier) = &self.notifier {
            notifier.notify_seeding_complete(gamestate, applied.len()).await;
        }

        self.reset_session();
        Ok(PollOutcome::Rewarded { granted: applied })
    }

    /// Expiration and description for every eligible seeder, skipping anyone
    /// holding an indefinite VIP
    fn decide_grants(&self, vips: &HashMap<String, VipPlayer>, now: DateTime<Utc>) -> Vec<VipGrant> {
        let indefinite = filter_indefinite_vip_steam_ids(vips, now);

        let mut steam_ids: Vec<&String> = self
            .cum_steam_ids
            .iter()
            .filter(|steam_id_64| {
                let keep = !indefinite.contains(*steam_id_64);
                if !keep {
                    debug!("{} has indefinite VIP, not rewarding", steam_id_64);
                }
                keep
            })
            .collect();
        steam_ids.sort();

        steam_ids
            .into_iter()
            .map(|steam_id_64| {
                let vip = vips.get(steam_id_64);
                let expiration = calc_vip_expiration_timestamp(
                    &self.config,
                    vip.and_then(|v| v.active_expiration(now)),
                    now,
                );

                let description = match vip {
                    Some(vip) => vip.player.name.clone(),
                    None => {
                        let name = self
                            .player_names
                            .get(steam_id_64)
                            .map(String::as_str)
                            .unwrap_or(steam_id_64.as_str());
                        render_template(&self.config.player_name_not_current_vip, &[("player_name", name)])
                    }
                };

                VipGrant {
                    steam_id_64: steam_id_64.clone(),
                    description,
                    expiration,
                    applied: false,
                }
            })
            .collect()
    }

    async fn message_reward(&self, grant: &VipGrant) {
        let vip_reward = format_vip_reward(self.config.vip_reward, self.config.nice_time_delta);
        let vip_expiration = format_expiration(&grant.expiration, self.config.nice_expiration_date);
        let message = render_template(
            &self.config.message_reward,
            &[
                ("vip_reward", vip_reward.as_str()),
                ("vip_expiration", vip_expiration.as_str()),
            ],
        );

        if let Err(e) = self.server.message_player(&grant.steam_id_64, &message).await {
            warn!("Failed to send reward message to {}: {}", grant.steam_id_64, e);
        }
    }

    fn reset_session(&mut self) {
        self.is_seeding = false;
        self.cum_steam_ids.clear();
        self.player_names.clear();
        self.announced_buckets.clear();
        self.checked_non_vip.clear();
    }

    /// Poll until Ctrl-C. Failed cycles are logged and retried on the next tick
    /// with the eligible set left as it was.
    pub async fn run(&mut self) -> Result<()> {
        info!(
            "Seeding monitor started (dry run: {}, cumulative: {}, online when seeded: {})",
            self.config.dry_run, self.config.cumulative_vip, self.config.online_when_seeded
        );

        loop {
            match self.poll_once(Utc::now()).await {
                Ok(PollOutcome::Rewarded { granted }) => {
                    let applied = granted.iter().filter(|g| g.applied).count();
                    info!("Seeding complete: {} of {} grants applied", applied, granted.len());
                }
                Ok(outcome) => debug!("Poll outcome: {:?}", outcome),
                Err(e) => {
                    warn!("Poll failed, keeping {} eligible seeders: {}", self.cum_steam_ids.len(), e);
                    if let Some(notifier) = &self.notifier {
                        notifier.notify_error(&format!("Poll failed: {}", e)).await;
                    }
                }
            }

            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    info!("Shutting down seeding monitor");
                    return Ok(());
                }
                _ = tokio::time::sleep(self.next_poll_interval()) => {}
            }
        }
    }
}

/// Highest configured bucket reached by `total_players` that has not been
/// announced yet this session
pub fn newly_crossed_bucket(buckets: &[u32], announced: &HashSet<u32>, total_players: u32) -> Option<u32> {
    buckets
        .iter()
        .copied()
        .filter(|bucket| *bucket <= total_players && !announced.contains(bucket))
        .max()
}
