//! Offline decision maker with canned lines and random targets.

use crate::decision::{ActionChoice, DecisionError, DecisionMaker, TurnContext, TurnTask};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use strictly_werewolf::{NightAbility, Role};
use tracing::{debug, instrument};

const VILLAGE_LINES: [&str; 5] = [
    "I have nothing to hide. Let's look at who has been too quiet.",
    "Something about {name} bothers me, but I can't say what yet.",
    "We should compare what everyone said yesterday before voting.",
    "I trust {name} for now. Convince me otherwise.",
    "Rushing the vote is exactly what a werewolf would want.",
];

const WEREWOLF_LINES: [&str; 3] = [
    "I've been watching {name}. Their story keeps changing.",
    "Let's not throw suspicion around without evidence.",
    "I'm just a simple villager trying to help.",
];

/// Plays without any network calls.
///
/// Speaks a canned line mentioning a random living player and picks a
/// uniformly random valid target. Useful for demos and tests.
#[derive(Debug)]
pub struct ScriptedAgent {
    rng: Mutex<StdRng>,
    think_time: Duration,
}

impl ScriptedAgent {
    /// Creates an agent seeded for reproducible games.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
            think_time: Duration::ZERO,
        }
    }

    /// Adds a pause before every decision, to simulate thinking.
    pub fn with_think_time(mut self, think_time: Duration) -> Self {
        self.think_time = think_time;
        self
    }

    async fn think(&self) {
        if !self.think_time.is_zero() {
            tokio::time::sleep(self.think_time).await;
        }
    }
}

#[async_trait::async_trait]
impl DecisionMaker for ScriptedAgent {
    #[instrument(skip_all, fields(actor = %context.actor.name()))]
    async fn discuss(&self, context: &TurnContext) -> Result<String, DecisionError> {
        self.think().await;
        let line = {
            let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
            let lines: &[&str] = if context.actor.role() == Role::Werewolf {
                &WEREWOLF_LINES
            } else {
                &VILLAGE_LINES
            };
            let others: Vec<&str> = context
                .roster
                .iter()
                .filter(|p| p.is_alive && &p.id != context.actor.id())
                .map(|p| p.name.as_str())
                .collect();
            let template = lines.choose(&mut *rng).copied().unwrap_or("...");
            let name = others.choose(&mut *rng).copied().unwrap_or("someone");
            template.replace("{name}", name)
        };
        debug!(line = %line, "Scripted line");
        Ok(line)
    }

    #[instrument(skip_all, fields(actor = %context.actor.name(), task = %context.task))]
    async fn act(&self, context: &TurnContext) -> Result<ActionChoice, DecisionError> {
        self.think().await;
        let target = {
            let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
            context.valid_targets.choose(&mut *rng).cloned()
        }
        .ok_or_else(|| DecisionError::new("No valid targets".to_string()))?;

        let reasoning = match context.task {
            TurnTask::Vote => "Their answers did not add up.",
            TurnTask::Night(NightAbility::Attack) => "They are getting too close to the truth.",
            TurnTask::Night(NightAbility::Divine) => "I need to know where they stand.",
            TurnTask::Night(NightAbility::Guard) => "They look like the next target.",
            TurnTask::Discuss => "No reason.",
        };
        debug!(%target, "Scripted target");
        Ok(ActionChoice::new(target, reasoning))
    }
}
