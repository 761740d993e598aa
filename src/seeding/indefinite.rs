use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Duration, Utc};

use crate::models::{VipPlayer, VipStatus};

/// How far ahead an expiration must lie to count as permanent. Seeding rewards
/// are hours or days; manual permanent VIPs are conventionally dated year 3000+.
pub const INDEFINITE_VIP_HORIZON_DAYS: i64 = 365 * 50;

pub fn indefinite_cutoff(now: DateTime<Utc>) -> DateTime<Utc> {
    now.checked_add_signed(Duration::days(INDEFINITE_VIP_HORIZON_DAYS))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Whether `vip` holds an effectively permanent VIP as of `now`
pub fn is_indefinite_vip(vip: &VipPlayer, now: DateTime<Utc>) -> bool {
    matches!(vip.status(now), VipStatus::Indefinite(_))
}

pub fn has_indefinite_vip(vip: &VipPlayer) -> bool {
    is_indefinite_vip(vip, Utc::now())
}

/// Steam IDs of roster entries that must never get a finite reward expiration
pub fn filter_indefinite_vip_steam_ids(
    vips: &HashMap<String, VipPlayer>,
    now: DateTime<Utc>,
) -> HashSet<String> {
    vips.iter()
        .filter(|(_, vip)| is_indefinite_vip(vip, now))
        .map(|(steam_id_64, _)| steam_id_64.clone())
        .collect()
}
