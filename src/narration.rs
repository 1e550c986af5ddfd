//! Game master narration text.

use strictly_werewolf::{NightAbility, Winner};

pub mod game {
    //! Phase announcements.

    /// First entry of every game.
    pub fn opening() -> &'static str {
        "The game of werewolf begins. Everyone, check your role in secret."
    }

    /// Another pass of discussion begins.
    pub fn discussion_round(round: u32, max_rounds: u32) -> String {
        format!("The discussion continues (round {round}/{max_rounds}).")
    }

    /// Discussion is over, voting starts.
    pub fn voting_begins() -> &'static str {
        "Discussion is over. It is time to vote on who will be executed."
    }

    /// Night falls after the vote.
    pub fn night_falls() -> &'static str {
        "A fearful night falls... Those with abilities, make your move."
    }

    /// Morning of a new day.
    pub fn new_day(day: u32) -> String {
        format!("It is the morning of day {day}. Begin the discussion.")
    }
}

pub mod vote {
    //! Day vote narration.

    /// A player's vote, public.
    pub fn cast(target: &str, reasoning: &str) -> String {
        format!("Votes for {target}. Reason: {reasoning}")
    }

    /// Outcome: execution.
    pub fn executed(victim: &str) -> String {
        format!("By the village's vote, {victim} will be executed.")
    }

    /// Outcome: split vote.
    pub fn split() -> &'static str {
        "The vote was split, so nobody is executed today."
    }

    /// Private note for mediums about the executed player.
    pub fn medium_reading(victim: &str, was_werewolf: bool) -> String {
        if was_werewolf {
            format!("(Medium reading) {victim} was a WEREWOLF.")
        } else {
            format!("(Medium reading) {victim} was HUMAN.")
        }
    }
}

pub mod night {
    //! Night narration.

    use super::NightAbility;

    /// A night action, scoped to whoever may know about it.
    pub fn action(ability: NightAbility, target: &str, reasoning: &str) -> String {
        let verb = match ability {
            NightAbility::Attack => "Attacks",
            NightAbility::Divine => "Divines",
            NightAbility::Guard => "Guards",
        };
        format!("{verb} {target}. Reason: {reasoning}")
    }

    /// Seer result, visible only to the seer.
    pub fn divination(target: &str, is_werewolf: bool) -> String {
        if is_werewolf {
            format!("(Divination) {target} is BLACK (werewolf).")
        } else {
            format!("(Divination) {target} is WHITE (human).")
        }
    }

    /// The werewolves' target died.
    pub fn killed(victim: &str) -> String {
        format!("Last night, {victim} was found dead...")
    }

    /// The werewolves' target was guarded.
    pub fn survived(victim: &str) -> String {
        format!("Last night, {victim} was attacked but survived!")
    }

    /// Nobody was attacked.
    pub fn peaceful() -> &'static str {
        "Nobody was attacked last night. A peaceful morning."
    }
}

pub mod failure {
    //! Notices for decision calls that gave up.

    /// Discussion line could not be produced.
    pub fn discussion(error: &str) -> String {
        format!("(Error while speaking: {error})")
    }

    /// Vote could not be produced; the voter abstains.
    pub fn vote(error: &str) -> String {
        format!("(Error while voting: {error})")
    }

    /// Night action could not be produced.
    pub fn night(error: &str) -> String {
        format!("(Error during night action: {error})")
    }

    /// Nobody was eligible to be targeted.
    pub fn no_targets() -> &'static str {
        "(No valid target; the turn passes.)"
    }
}

/// Victory announcement.
pub fn victory(winner: Winner) -> &'static str {
    match winner {
        Winner::Villagers => "Every werewolf is dead. The villagers win!",
        Winner::Werewolves => "The werewolves now match the villagers. The werewolves win!",
    }
}
