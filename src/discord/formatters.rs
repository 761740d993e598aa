use crate::{config::DiscordConfig, models::GameState, utils::render_template};

/// "{num_allied_players} - {num_axis_players}" line appended to announcements
pub fn format_player_count(config: &DiscordConfig, gamestate: &GameState) -> String {
    let allied = gamestate.num_allied_players.to_string();
    let axis = gamestate.num_axis_players.to_string();

    render_template(
        &config.player_count_message,
        &[("num_allied_players", allied.as_str()), ("num_axis_players", axis.as_str())],
    )
}

pub fn format_seeding_progress(config: &DiscordConfig, gamestate: &GameState, bucket: u32) -> String {
    let player_count = bucket.to_string();
    let headline = render_template(
        &config.seeding_in_progress_message,
        &[("player_count", player_count.as_str())],
    );

    format!(
        "🌱 {}\n{} on {}",
        headline,
        format_player_count(config, gamestate),
        gamestate.current_map
    )
}

pub fn format_seeding_complete(config: &DiscordConfig, gamestate: &GameState, rewarded: usize) -> String {
    format!(
        "✅ {}\n{}\n_{} seeders rewarded_",
        config.seeding_complete_message,
        format_player_count(config, gamestate),
        rewarded
    )
}
