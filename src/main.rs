mod cli;

use chrono::Utc;
use clap::Parser;
use cli::{Cli, Commands};
use colored::*;
use seed_vip::{
    api::{ApiClient, GameServer},
    config::Config,
    discord::DiscordNotifier,
    error,
    models::VipStatus,
    seeding::{self, SeedingMonitor},
    utils,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("seed_vip=debug,info")),
        )
        .init();

    let cli = Cli::parse();

    let config = match Config::load(&cli.config) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Failed to load configuration from {}: {}", cli.config, e);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Run { dry_run } => {
            info!("Starting seeding monitor...");
            run_monitor(&config, dry_run).await
        }

        Commands::Check => check_server(&config).await,

        Commands::Vips { indefinite } => list_vips(&config, indefinite).await,

        Commands::Init => initialize(&config),
    };

    if let Err(e) = result {
        error!("{}", format!("Error: {}", e).red());
        std::process::exit(1);
    }
}

async fn run_monitor(config: &Config, dry_run: bool) -> error::Result<()> {
    let mut server_config = config.server_config()?;
    server_config.dry_run |= dry_run;

    println!("{}", "Starting seeding monitor...".green());
    println!("Dry run: {}", server_config.dry_run);

    let notifier = DiscordNotifier::new(config);
    if notifier.is_some() {
        println!("{}", "✓ Discord notifications enabled".green());
    }

    let client = ApiClient::new(&config.api, server_config.forward)?;
    let mut monitor = SeedingMonitor::new(client, server_config, notifier);
    monitor.run().await
}

async fn check_server(config: &Config) -> error::Result<()> {
    let server_config = config.server_config()?;
    let client = ApiClient::new(&config.api, server_config.forward)?;

    let gamestate = client.get_gamestate().await?;
    let conditions = server_config.seeding_conditions(&gamestate);

    println!("{}", "=== Server Status ===".cyan().bold());
    println!("Map:             {}", gamestate.current_map);
    match gamestate.time_remaining() {
        Ok(remaining) => println!("Time Remaining:  {}", utils::humanize_duration(remaining)),
        Err(_) => println!("Time Remaining:  {}", gamestate.raw_time_remaining),
    }
    println!(
        "Players:         {} allied / {} axis",
        gamestate.num_allied_players, gamestate.num_axis_players
    );

    println!("\n{}", "Seeding Conditions:".yellow());
    for condition in &conditions {
        let status = if condition.is_met() { "met".green() } else { "not met".red() };
        println!(
            "  {:<7} {:>3} in [{}, {}]  {}",
            condition.faction.to_string(),
            condition.current_players,
            condition.bounds.min_players(),
            condition.bounds.max_players(),
            status
        );
    }

    let state = if seeding::all_met(&conditions) {
        "SEEDING".yellow()
    } else if server_config.is_seeded(&gamestate) {
        "SEEDED".green()
    } else {
        "OUTSIDE SEEDING RANGE".normal()
    };
    println!("\nState: {}", state.bold());

    Ok(())
}

async fn list_vips(config: &Config, indefinite_only: bool) -> error::Result<()> {
    let server_config = config.server_config()?;
    let client = ApiClient::new(&config.api, server_config.forward)?;

    let vips = client.get_vips().await?;
    let now = Utc::now();

    let mut rows: Vec<_> = vips
        .values()
        .filter(|vip| !indefinite_only || seeding::is_indefinite_vip(vip, now))
        .collect();
    rows.sort_by(|a, b| a.player.name.cmp(&b.player.name));

    println!("{}", "=== VIP Roster ===".cyan().bold());
    utils::print_table_border(80);
    utils::print_table_row(&["Steam ID", "Name", "Status"], &[16, 32, 30]);
    utils::print_table_border(80);

    for vip in &rows {
        let status = match vip.status(now) {
            VipStatus::Indefinite(_) => "indefinite".cyan().to_string(),
            VipStatus::Expired(_) => vip.status(now).to_string().red().to_string(),
            other => other.to_string(),
        };
        utils::print_table_row(
            &[&utils::format_steam_id(vip.steam_id_64()), &vip.player.name, &status],
            &[16, 32, 30],
        );
    }
    utils::print_table_border(80);

    let indefinite = seeding::filter_indefinite_vip_steam_ids(&vips, now);
    println!(
        "Total: {}  Indefinite: {}  Shown: {}",
        vips.len(),
        indefinite.len().to_string().cyan(),
        rows.len()
    );

    Ok(())
}

fn initialize(config: &Config) -> error::Result<()> {
    let server_config = config.server_config()?;

    println!("{}", "✓ Configuration loaded".green());
    println!("\n{}", "Configuration:".cyan());
    println!("  API URL:            {}", config.api.base_url);
    println!(
        "  Allied bounds:      {} - {}",
        server_config.allies.min_players(),
        server_config.allies.max_players()
    );
    println!(
        "  Axis bounds:        {} - {}",
        server_config.axis.min_players(),
        server_config.axis.max_players()
    );
    println!(
        "  Minimum play time:  {}",
        utils::humanize_duration(server_config.minimum_play_time)
    );
    println!(
        "  VIP reward:         {}",
        utils::humanize_duration(server_config.vip_reward)
    );
    println!("  Cumulative VIP:     {}", server_config.cumulative_vip);
    println!("  Online when seeded: {}", server_config.online_when_seeded);
    println!("  Dry run:            {}", server_config.dry_run);
    println!(
        "  Discord:            {}",
        if DiscordNotifier::new(config).is_some() { "enabled" } else { "disabled" }
    );

    println!("\n{}", "Ready to use! Try running:".cyan());
    println!("  {} to see the current seeding state", "seed-vip check".yellow());
    println!("  {} to start rewarding seeders", "seed-vip run".yellow());
    Ok(())
}
