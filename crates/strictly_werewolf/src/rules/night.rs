//! Night resolution: werewolf kill against bodyguard protection.

use crate::types::{Player, PlayerId, Role};
use tracing::{debug, instrument};

/// What happened overnight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NightResult {
    /// The werewolves' target died.
    Killed(PlayerId),
    /// The werewolves' target was guarded and survived.
    Protected(PlayerId),
    /// No werewolf picked a target.
    Peaceful,
}

/// Picks the kill target from the werewolves' picks.
///
/// The picks are stably sorted by how often each occurs and the last one
/// wins. On a tie for the most picks this favours the tied target that
/// appears last in `picks`.
pub fn majority_target(picks: &[PlayerId]) -> Option<PlayerId> {
    let occurrences = |target: &PlayerId| picks.iter().filter(|p| *p == target).count();
    let mut sorted = picks.to_vec();
    sorted.sort_by_key(|target| occurrences(target));
    sorted.pop()
}

fn picks_of(players: &[Player], role: Role) -> Vec<PlayerId> {
    players
        .iter()
        .filter(|p| p.is_alive() && p.role() == role)
        .filter_map(|p| p.vote_target().clone())
        .collect()
}

/// Resolves the recorded night actions of living werewolves and bodyguards.
#[instrument(skip(players))]
pub fn resolve_night(players: &[Player]) -> NightResult {
    let wolf_picks = picks_of(players, Role::Werewolf);
    let guarded = picks_of(players, Role::Bodyguard);

    let Some(target) = majority_target(&wolf_picks) else {
        debug!("No werewolf target");
        return NightResult::Peaceful;
    };

    if !players.iter().any(|p| p.id() == &target) {
        debug!(%target, "Werewolf target is not at the table");
        return NightResult::Peaceful;
    }

    let result = if guarded.contains(&target) {
        NightResult::Protected(target)
    } else {
        NightResult::Killed(target)
    };
    debug!(?result, "Night resolved");
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[&str]) -> Vec<PlayerId> {
        raw.iter().map(|s| PlayerId::from(*s)).collect()
    }

    fn table(wolf_picks: &[&str], guard_pick: Option<&str>) -> Vec<Player> {
        let mut players: Vec<Player> = wolf_picks
            .iter()
            .enumerate()
            .map(|(i, pick)| {
                let mut wolf = Player::new(format!("w{i}").into(), "Wolf", Role::Werewolf, "", "");
                wolf.set_vote_target((*pick).into());
                wolf
            })
            .collect();
        let mut guard = Player::new("g".into(), "Guard", Role::Bodyguard, "", "");
        if let Some(pick) = guard_pick {
            guard.set_vote_target(pick.into());
        }
        players.push(guard);
        for name in ["X", "Y", "Z"] {
            players.push(Player::new(name.into(), name, Role::Villager, "", ""));
        }
        players
    }

    #[test]
    fn test_majority_wins() {
        assert_eq!(majority_target(&ids(&["X", "X", "Y"])), Some("X".into()));
        assert_eq!(majority_target(&ids(&["Y", "X", "X"])), Some("X".into()));
    }

    #[test]
    fn test_tie_favours_last_pick() {
        assert_eq!(majority_target(&ids(&["X", "Y"])), Some("Y".into()));
        assert_eq!(majority_target(&ids(&["X", "Y", "Y", "X"])), Some("X".into()));
    }

    #[test]
    fn test_no_picks() {
        assert_eq!(majority_target(&[]), None);
        assert_eq!(resolve_night(&table(&[], Some("X"))), NightResult::Peaceful);
    }

    #[test]
    fn test_unguarded_target_dies() {
        let players = table(&["X", "X", "Y"], Some("Z"));
        assert_eq!(resolve_night(&players), NightResult::Killed("X".into()));
    }

    #[test]
    fn test_guarded_target_survives() {
        let players = table(&["X", "X", "Y"], Some("X"));
        assert_eq!(resolve_night(&players), NightResult::Protected("X".into()));
    }

    #[test]
    fn test_dead_bodyguard_does_not_protect() {
        let mut players = table(&["X"], Some("X"));
        if let Some(guard) = players.iter_mut().find(|p| p.role() == Role::Bodyguard) {
            guard.kill();
        }
        assert_eq!(resolve_night(&players), NightResult::Killed("X".into()));
    }
}
