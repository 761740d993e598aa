use chrono::{DateTime, Utc};

use crate::config::ServerConfig;

/// New expiration for a seeding reward.
///
/// With `cumulative_vip` the reward stacks onto `expiration` when there is one;
/// otherwise it always runs from `from_time`. Saturates at the latest
/// representable instant instead of overflowing.
pub fn calc_vip_expiration_timestamp(
    config: &ServerConfig,
    expiration: Option<DateTime<Utc>>,
    from_time: DateTime<Utc>,
) -> DateTime<Utc> {
    let base = if config.cumulative_vip {
        expiration.unwrap_or(from_time)
    } else {
        from_time
    };

    base.checked_add_signed(config.vip_reward)
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn config(cumulative_vip: bool) -> ServerConfig {
        ServerConfig {
            cumulative_vip,
            vip_reward: Duration::hours(24),
            ..ServerConfig::default()
        }
    }

    fn at(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    #[test]
    fn test_non_cumulative_without_prior() {
        let from_time = at("2023-12-20T22:38:13.780570Z");
        assert_eq!(
            calc_vip_expiration_timestamp(&config(false), None, from_time),
            from_time + Duration::hours(24)
        );
    }

    #[test]
    fn test_non_cumulative_ignores_prior() {
        let from_time = at("2023-12-20T22:38:13Z");
        let prior = at("2023-12-25T00:00:00Z");
        assert_eq!(
            calc_vip_expiration_timestamp(&config(false), Some(prior), from_time),
            at("2023-12-21T22:38:13Z")
        );
    }

    #[test]
    fn test_cumulative_stacks_on_prior() {
        let from_time = at("2023-12-20T22:38:13Z");
        let prior = at("2023-12-21T22:38:13Z");
        assert_eq!(
            calc_vip_expiration_timestamp(&config(true), Some(prior), from_time),
            at("2023-12-22T22:38:13Z")
        );
    }

    #[test]
    fn test_cumulative_without_prior() {
        let from_time = at("2023-12-20T22:38:13.780570Z");
        assert_eq!(
            calc_vip_expiration_timestamp(&config(true), None, from_time),
            at("2023-12-21T22:38:13.780570Z")
        );
    }

    #[test]
    fn test_saturates_instead_of_overflowing() {
        let result = calc_vip_expiration_timestamp(&config(true), Some(DateTime::<Utc>::MAX_UTC), Utc::now());
        assert_eq!(result, DateTime::<Utc>::MAX_UTC);
    }

    #[test]
    fn test_is_repeatable() {
        let from_time = at("2024-03-01T12:00:00Z");
        let prior = Some(at("2024-03-02T12:00:00Z"));
        let config = config(true);
        assert_eq!(
            calc_vip_expiration_timestamp(&config, prior, from_time),
            calc_vip_expiration_timestamp(&config, prior, from_time)
        );
    }
}
