use chrono::{DateTime, Duration, Utc};

/// Render a duration as "1 day, 2 hours, 5 minutes"
pub fn humanize_duration(duration: Duration) -> String {
    let total_minutes = duration.num_minutes().max(0);
    let days = total_minutes / (60 * 24);
    let hours = (total_minutes / 60) % 24;
    let minutes = total_minutes % 60;

    let mut parts = Vec::new();
    for (value, unit) in [(days, "day"), (hours, "hour"), (minutes, "minute")] {
        if value > 0 {
            let plural = if value == 1 { "" } else { "s" };
            parts.push(format!("{} {}{}", value, unit, plural));
        }
    }

    if parts.is_empty() {
        "less than a minute".to_string()
    } else {
        parts.join(", ")
    }
}

/// Reward duration as shown to players
pub fn format_vip_reward(duration: Duration, nice: bool) -> String {
    if nice {
        humanize_duration(duration)
    } else {
        format!("{} hours", duration.num_hours())
    }
}

/// Expiration as shown to players
pub fn format_expiration(expiration: &DateTime<Utc>, nice: bool) -> String {
    if nice {
        expiration.format("%A %-d %B %Y at %H:%M UTC").to_string()
    } else {
        expiration.to_rfc3339()
    }
}

/// Substitute `{key}` placeholders; unknown placeholders are left as-is
pub fn render_template(template: &str, values: &[(&str, &str)]) -> String {
    values.iter().fold(template.to_string(), |acc, (key, value)| {
        acc.replace(&format!("{{{}}}", key), value)
    })
}

/// Format steam ID truncated for display
pub fn format_steam_id(steam_id_64: &str) -> String {
    let len = steam_id_64.chars().count();
    if len <= 12 {
        return steam_id_64.to_string();
    }

    let head: String = steam_id_64.chars().take(6).collect();
    let tail: String = steam_id_64.chars().skip(len - 4).collect();
    format!("{}...{}", head, tail)
}

/// Print a formatted table border
pub fn print_table_border(width: usize) {
    println!("{}", "=".repeat(width));
}

/// Print a table row with columns
pub fn print_table_row(columns: &[&str], widths: &[usize]) {
    let mut row = String::new();
    for (col, width) in columns.iter().zip(widths) {
        row.push_str(&format!("{:<width$}  ", col, width = width));
    }
    println!("{}", row.trim_end());
}
