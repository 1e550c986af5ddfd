//! Contract between the game master and whatever decides for the players.
//!
//! A [`DecisionMaker`] is handed an owned [`TurnContext`] snapshot and returns
//! an utterance or a target. It never sees the game state itself, other
//! players' roles, or log entries scoped away from the acting player.

use derive_more::{Display, Error};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use strictly_werewolf::{
    LogEntry, NightAbility, Phase, Player, PlayerId, PublicProfile,
};
use tracing::{instrument, warn};

/// What the acting player is being asked to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
pub enum TurnTask {
    /// Say something during the day discussion.
    #[display("discuss")]
    Discuss,
    /// Choose who to execute.
    #[display("vote")]
    Vote,
    /// Use a night ability.
    #[display("{_0}")]
    Night(NightAbility),
}

/// Snapshot handed to the decision maker for one turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnContext {
    /// The acting player, including their own role.
    pub actor: Player,
    /// Everyone at the table, without roles.
    pub roster: Vec<PublicProfile>,
    /// Log entries the actor may see, oldest first.
    pub history: Vec<LogEntry>,
    /// Current phase.
    pub phase: Phase,
    /// Current day.
    pub day: u32,
    /// Requested decision.
    pub task: TurnTask,
    /// Ids the actor may target (empty for discussion).
    pub valid_targets: Vec<PlayerId>,
}

impl TurnContext {
    /// Looks up a roster entry by id.
    pub fn profile(&self, id: &PlayerId) -> Option<&PublicProfile> {
        self.roster.iter().find(|p| &p.id == id)
    }
}

/// A target pick with the reasoning behind it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionChoice {
    /// Chosen player.
    pub target_id: PlayerId,
    /// Free-text justification.
    pub reasoning: String,
}

impl ActionChoice {
    /// Creates a choice.
    pub fn new(target_id: impl Into<PlayerId>, reasoning: impl Into<String>) -> Self {
        Self {
            target_id: target_id.into(),
            reasoning: reasoning.into(),
        }
    }
}

/// Failure reported by a decision maker.
#[derive(Debug, Clone, Display, Error)]
#[display("Decision error: {} at {}:{}", message, file, line)]
pub struct DecisionError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl DecisionError {
    /// Creates a new decision error.
    #[track_caller]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

/// Produces utterances and targets for players.
///
/// Calls may be slow and may fail; the game master retries them and logs the
/// final failure instead of halting.
#[async_trait::async_trait]
pub trait DecisionMaker: Send + Sync {
    /// Returns a discussion line for `context.actor`.
    async fn discuss(&self, context: &TurnContext) -> Result<String, DecisionError>;

    /// Returns a vote or night-action target for `context.actor`.
    async fn act(&self, context: &TurnContext) -> Result<ActionChoice, DecisionError>;
}

/// Prefix added to the reasoning of a substituted target.
pub const AUTO_CORRECTED: &str = "(auto-corrected)";

/// Ensures the choice targets a valid player.
///
/// An invalid target is replaced by a uniformly random valid one and the
/// reasoning is annotated. Returns `None` only when there is nobody to target.
#[instrument(skip(choice, valid_targets, rng), fields(target = %choice.target_id))]
pub fn validate_choice<R: Rng + ?Sized>(
    choice: ActionChoice,
    valid_targets: &[PlayerId],
    rng: &mut R,
) -> Option<ActionChoice> {
    if valid_targets.contains(&choice.target_id) {
        return Some(choice);
    }
    let substitute = valid_targets.choose(rng)?.clone();
    warn!(%substitute, "Invalid target returned, substituting a random valid target");
    Some(ActionChoice {
        target_id: substitute,
        reasoning: format!("{} {}", AUTO_CORRECTED, choice.reasoning),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn targets() -> Vec<PlayerId> {
        vec!["a".into(), "b".into(), "c".into()]
    }

    #[test]
    fn test_valid_choice_passes_through() {
        let mut rng = StdRng::seed_from_u64(7);
        let choice = ActionChoice::new("b", "suspicious");
        assert_eq!(
            validate_choice(choice.clone(), &targets(), &mut rng),
            Some(choice)
        );
    }

    #[test]
    fn test_invalid_choice_is_substituted_and_annotated() {
        let mut rng = StdRng::seed_from_u64(7);
        let fixed = validate_choice(ActionChoice::new("zz", "gut feeling"), &targets(), &mut rng)
            .expect("substitute");
        assert!(targets().contains(&fixed.target_id));
        assert_eq!(fixed.reasoning, format!("{} gut feeling", AUTO_CORRECTED));
    }

    #[test]
    fn test_no_targets() {
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(validate_choice(ActionChoice::new("a", ""), &[], &mut rng), None);
    }

    #[test]
    fn test_task_display() {
        assert_eq!(TurnTask::Vote.to_string(), "vote");
        assert_eq!(TurnTask::Night(NightAbility::Divine).to_string(), "divine");
    }
}
