pub mod conditions;
pub mod eligibility;
pub mod expiration;
pub mod indefinite;
pub mod monitor;

pub use conditions::all_met;
pub use eligibility::{collect_steam_ids, RetentionPolicy};
pub use expiration::calc_vip_expiration_timestamp;
pub use indefinite::{filter_indefinite_vip_steam_ids, has_indefinite_vip, is_indefinite_vip};
pub use monitor::{PollOutcome, SeedingMonitor, VipGrant};
