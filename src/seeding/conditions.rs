use crate::models::PlayerCountCondition;

/// True iff every condition holds; vacuously true for an empty slice
pub fn all_met(conditions: &[PlayerCountCondition]) -> bool {
    conditions.iter().all(PlayerCountCondition::is_met)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Faction;

    fn condition(faction: Faction, current: u32) -> PlayerCountCondition {
        PlayerCountCondition::new(faction, 3, 10, current).unwrap()
    }

    #[test]
    fn test_all_met() {
        let conditions = [condition(Faction::Axis, 5), condition(Faction::Allied, 5)];
        assert!(all_met(&conditions));
    }

    #[test]
    fn test_one_unmet_fails_all() {
        let conditions = [condition(Faction::Axis, 5), condition(Faction::Allied, 11)];
        assert!(!all_met(&conditions));

        let conditions = [condition(Faction::Axis, 2), condition(Faction::Allied, 5)];
        assert!(!all_met(&conditions));
    }

    #[test]
    fn test_empty_is_vacuously_met() {
        assert!(all_met(&[]));
    }

    #[test]
    fn test_all_met_is_repeatable() {
        let conditions = [condition(Faction::Axis, 10), condition(Faction::Allied, 3)];
        assert_eq!(all_met(&conditions), all_met(&conditions));
        assert!(all_met(&conditions));
    }
}
