//! Day vote tally.

use crate::types::{Player, PlayerId};
use tracing::{debug, instrument};

/// Result of counting the day's votes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoteOutcome {
    /// One candidate has strictly the most votes.
    Execute {
        /// Player to execute.
        target: PlayerId,
        /// Votes received.
        votes: usize,
    },
    /// Two or more candidates share the maximum. Nobody is executed.
    Tie {
        /// Candidates sharing the maximum, in first-vote order.
        candidates: Vec<PlayerId>,
        /// The shared vote count.
        votes: usize,
    },
    /// Nobody cast a vote.
    NoVotes,
}

impl VoteOutcome {
    /// Returns the executed player, if any.
    pub fn executed(&self) -> Option<&PlayerId> {
        match self {
            VoteOutcome::Execute { target, .. } => Some(target),
            _ => None,
        }
    }
}

/// Counts votes per target, keeping the order in which targets first appear.
pub fn count_votes<'a>(votes: impl IntoIterator<Item = &'a PlayerId>) -> Vec<(PlayerId, usize)> {
    let mut counts: Vec<(PlayerId, usize)> = Vec::new();
    for target in votes {
        match counts.iter_mut().find(|(id, _)| id == target) {
            Some((_, n)) => *n += 1,
            None => counts.push((target.clone(), 1)),
        }
    }
    counts
}

/// Tallies the recorded votes of living players.
#[instrument(skip(players))]
pub fn tally_votes(players: &[Player]) -> VoteOutcome {
    let counts = count_votes(
        players
            .iter()
            .filter(|p| p.is_alive())
            .filter_map(|p| p.vote_target().as_ref()),
    );
    let outcome = decide(counts);
    debug!(?outcome, "Votes tallied");
    outcome
}

fn decide(counts: Vec<(PlayerId, usize)>) -> VoteOutcome {
    let Some(max) = counts.iter().map(|(_, n)| *n).max() else {
        return VoteOutcome::NoVotes;
    };
    let mut leaders: Vec<PlayerId> = counts
        .into_iter()
        .filter(|(_, n)| *n == max)
        .map(|(id, _)| id)
        .collect();

    if leaders.len() == 1 {
        VoteOutcome::Execute {
            target: leaders.remove(0),
            votes: max,
        }
    } else {
        VoteOutcome::Tie {
            candidates: leaders,
            votes: max,
        }
    }
}
