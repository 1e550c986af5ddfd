//! Win detection for werewolf.

use crate::types::{Player, Winner};
use tracing::instrument;

/// Checks whether either side has won.
///
/// Villagers win once no werewolf is alive. Werewolves win once they are at
/// least as many as everyone else alive.
#[instrument(skip(players))]
pub fn check_winner(players: &[Player]) -> Option<Winner> {
    let alive = players.iter().filter(|p| p.is_alive());
    let (wolves, humans) = alive.fold((0usize, 0usize), |(w, h), p| {
        if p.role().is_werewolf() { (w + 1, h) } else { (w, h + 1) }
    });

    if wolves == 0 {
        Some(Winner::Villagers)
    } else if wolves >= humans {
        Some(Winner::Werewolves)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Role;

    fn table(roles: &[(Role, bool)]) -> Vec<Player> {
        roles
            .iter()
            .enumerate()
            .map(|(i, (role, alive))| {
                let mut p = Player::new(format!("p{i}").into(), "", *role, "", "");
                if !alive {
                    p.kill();
                }
                p
            })
            .collect()
    }

    #[test]
    fn test_wolf_parity_wins() {
        let players = table(&[(Role::Werewolf, true), (Role::Villager, true), (Role::Seer, false)]);
        assert_eq!(check_winner(&players), Some(Winner::Werewolves));
    }

    #[test]
    fn test_no_wolves_villagers_win() {
        let players = table(&[(Role::Werewolf, false), (Role::Villager, true)]);
        assert_eq!(check_winner(&players), Some(Winner::Villagers));
    }

    #[test]
    fn test_game_continues() {
        let players = table(&[
            (Role::Werewolf, true),
            (Role::Villager, true),
            (Role::Villager, true),
            (Role::Seer, false),
        ]);
        assert_eq!(check_winner(&players), None);
    }
}
