//! Turn-order filters over the canonical player order.

use crate::types::{Player, PlayerId};

/// Living players, in seating order.
pub fn alive_players(players: &[Player]) -> Vec<&Player> {
    players.iter().filter(|p| p.is_alive()).collect()
}

/// Living players with a night ability, in seating order.
pub fn night_actors(players: &[Player]) -> Vec<&Player> {
    players
        .iter()
        .filter(|p| p.is_alive() && p.role().night_ability().is_some())
        .collect()
}

/// Ids a player may target: everyone alive except themselves.
pub fn valid_targets(players: &[Player], actor: &PlayerId) -> Vec<PlayerId> {
    players
        .iter()
        .filter(|p| p.is_alive() && p.id() != actor)
        .map(|p| p.id().clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Role;

    fn table() -> Vec<Player> {
        let mut players = vec![
            Player::new("w".into(), "W", Role::Werewolf, "", ""),
            Player::new("s".into(), "S", Role::Seer, "", ""),
            Player::new("m".into(), "M", Role::Medium, "", ""),
            Player::new("b".into(), "B", Role::Bodyguard, "", ""),
            Player::new("v".into(), "V", Role::Villager, "", ""),
        ];
        players[3].kill();
        players
    }

    #[test]
    fn test_night_actors_skip_dead_and_passive_roles() {
        let players = table();
        let ids: Vec<&str> = night_actors(&players).iter().map(|p| p.id().as_str()).collect();
        assert_eq!(ids, vec!["w", "s"]);
    }

    #[test]
    fn test_valid_targets_exclude_self_and_dead() {
        let players = table();
        let targets = valid_targets(&players, &"w".into());
        let ids: Vec<&str> = targets.iter().map(PlayerId::as_str).collect();
        assert_eq!(ids, vec!["s", "m", "v"]);
    }

    #[test]
    fn test_alive_players_keep_seating_order() {
        let players = table();
        assert_eq!(alive_players(&players).len(), 4);
        assert_eq!(alive_players(&players)[3].id().as_str(), "v");
    }
}
