//! Role compositions keyed by table size.

use crate::types::Role;

/// Five-seat table: one werewolf, one seer, three villagers.
pub const ROLES_5: [Role; 5] = [
    Role::Werewolf,
    Role::Seer,
    Role::Villager,
    Role::Villager,
    Role::Villager,
];

/// Seven-seat table: two werewolves, seer, bodyguard, three villagers.
pub const ROLES_7: [Role; 7] = [
    Role::Werewolf,
    Role::Werewolf,
    Role::Seer,
    Role::Bodyguard,
    Role::Villager,
    Role::Villager,
    Role::Villager,
];

/// Returns the role composition for `player_count`, if one exists.
pub fn roles_for(player_count: usize) -> Option<&'static [Role]> {
    match player_count {
        5 => Some(&ROLES_5),
        7 => Some(&ROLES_7),
        _ => None,
    }
}

/// Table sizes with a preset.
pub fn supported_player_counts() -> &'static [usize] {
    &[5, 7]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_have_one_seer_and_fewer_wolves_than_humans() {
        for &count in supported_player_counts() {
            let roles = roles_for(count).expect("preset exists");
            assert_eq!(roles.len(), count);
            let wolves = roles.iter().filter(|r| r.is_werewolf()).count();
            assert!(wolves >= 1);
            assert!(wolves < count - wolves);
            assert_eq!(roles.iter().filter(|r| **r == Role::Seer).count(), 1);
        }
    }

    #[test]
    fn test_unknown_size() {
        assert!(roles_for(6).is_none());
    }
}
