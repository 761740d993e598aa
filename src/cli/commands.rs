use clap::{Parser, Subcommand};

use seed_vip::config::DEFAULT_CONFIG_PATH;

#[derive(Parser)]
#[command(name = "seed-vip")]
#[command(about = "Reward players who seed a game server with temporary VIP")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file (extension optional)
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    pub config: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the seeding monitor until interrupted
    Run {
        /// Dry run mode (decide rewards but don't grant VIP or message players)
        #[arg(long)]
        dry_run: bool,
    },

    /// Poll the server once and show whether it is seeding
    Check,

    /// List the VIP roster and how each entry is classified
    Vips {
        /// Only show indefinite (permanent) VIPs
        #[arg(short, long)]
        indefinite: bool,
    },

    /// Validate and print the configuration
    Init,
}
