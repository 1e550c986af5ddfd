//! Core domain types for the werewolf game.

use derive_getters::Getters;
use derive_more::{Display, From};
use serde::{Deserialize, Serialize};

/// Opaque player identifier.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Display, From, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    /// Creates a player id from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PlayerId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Player role. Closed set; assigned once at setup.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Kills one player each night, wins by reaching parity.
    #[display("Werewolf")]
    Werewolf,
    /// Learns one player's allegiance each night.
    #[display("Seer")]
    Seer,
    /// Shields one player from the night attack.
    #[display("Bodyguard")]
    Bodyguard,
    /// Learns whether the executed player was a werewolf.
    #[display("Medium")]
    Medium,
    /// No ability.
    #[display("Villager")]
    Villager,
}

impl Role {
    /// Returns true for werewolves.
    pub fn is_werewolf(self) -> bool {
        self == Role::Werewolf
    }

    /// Returns the ability this role uses during the night, if any.
    ///
    /// Villagers and mediums never act at night.
    pub fn night_ability(self) -> Option<NightAbility> {
        match self {
            Role::Werewolf => Some(NightAbility::Attack),
            Role::Seer => Some(NightAbility::Divine),
            Role::Bodyguard => Some(NightAbility::Guard),
            Role::Medium | Role::Villager => None,
        }
    }
}

/// A night-time ability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
pub enum NightAbility {
    /// Werewolf kill attempt.
    #[display("attack")]
    Attack,
    /// Seer inspection.
    #[display("divine")]
    Divine,
    /// Bodyguard protection.
    #[display("guard")]
    Guard,
}

/// The two competing sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Team {
    /// Everyone who is not a werewolf.
    #[display("VILLAGERS")]
    Villagers,
    /// The werewolf pack.
    #[display("WEREWOLVES")]
    Werewolves,
}

/// Winning side of a finished game.
pub type Winner = Team;

/// Stage of the day/night cycle.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    /// Before `init_game`.
    #[default]
    #[display("SETUP")]
    Setup,
    /// Players take turns speaking.
    #[display("DAY_DISCUSSION")]
    DayDiscussion,
    /// Players vote on an execution.
    #[display("DAY_VOTE")]
    DayVote,
    /// Werewolves, seer and bodyguard act.
    #[display("NIGHT_ACTION")]
    NightAction,
    /// Terminal.
    #[display("GAME_OVER")]
    GameOver,
}

impl Phase {
    /// Returns true during the night.
    pub fn is_night(self) -> bool {
        self == Phase::NightAction
    }
}

/// A seat at the table.
///
/// Role and identity never change after creation. Liveness only goes from
/// alive to dead, through [`Player::kill`].
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct Player {
    /// Opaque identifier.
    id: PlayerId,
    /// Display name.
    name: String,
    /// Secret role.
    #[getter(skip)]
    role: Role,
    /// Behavioural hint handed to the decision maker.
    personality: String,
    /// Cosmetic avatar URL.
    avatar: String,
    #[getter(skip)]
    is_alive: bool,
    /// Target recorded during the current vote or night.
    vote_target: Option<PlayerId>,
    #[getter(skip)]
    protected: bool,
}

impl Player {
    /// Creates a living player.
    pub fn new(
        id: PlayerId,
        name: impl Into<String>,
        role: Role,
        personality: impl Into<String>,
        avatar: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            role,
            personality: personality.into(),
            avatar: avatar.into(),
            is_alive: true,
            vote_target: None,
            protected: false,
        }
    }

    /// Returns the player's role.
    pub fn role(&self) -> Role {
        self.role
    }

    /// Returns true while the player is alive.
    pub fn is_alive(&self) -> bool {
        self.is_alive
    }

    /// Returns true if a bodyguard chose this player tonight.
    pub fn is_protected(&self) -> bool {
        self.protected
    }

    /// Marks the player dead. There is no way back.
    pub fn kill(&mut self) {
        self.is_alive = false;
    }

    /// Records the target of this player's vote or night action.
    pub fn set_vote_target(&mut self, target: PlayerId) {
        self.vote_target = Some(target);
    }

    /// Flags the player as guarded for the current night.
    pub fn set_protected(&mut self) {
        self.protected = true;
    }

    /// Clears per-phase transient fields.
    pub fn clear_transient(&mut self) {
        self.vote_target = None;
        self.protected = false;
    }

    /// Returns the roster view of this player, without the role.
    pub fn public_profile(&self) -> PublicProfile {
        PublicProfile {
            id: self.id.clone(),
            name: self.name.clone(),
            is_alive: self.is_alive,
            personality: self.personality.clone(),
        }
    }
}

/// What every participant may know about another player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicProfile {
    /// Player id.
    pub id: PlayerId,
    /// Display name.
    pub name: String,
    /// Liveness.
    pub is_alive: bool,
    /// Behavioural hint (public table talk persona).
    pub personality: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kill_is_monotonic() {
        let mut player = Player::new("a".into(), "Ann", Role::Villager, "calm", "");
        assert!(player.is_alive());
        player.kill();
        player.clear_transient();
        assert!(!player.is_alive());
    }

    #[test]
    fn test_public_profile_hides_role() {
        let player = Player::new("w".into(), "Wes", Role::Werewolf, "sly", "");
        let json = serde_json::to_string(&player.public_profile()).expect("serialize");
        assert!(!json.contains("WEREWOLF"));
        assert!(json.contains("Wes"));
    }

    #[test]
    fn test_night_abilities() {
        assert_eq!(Role::Werewolf.night_ability(), Some(NightAbility::Attack));
        assert_eq!(Role::Seer.night_ability(), Some(NightAbility::Divine));
        assert_eq!(Role::Bodyguard.night_ability(), Some(NightAbility::Guard));
        assert_eq!(Role::Medium.night_ability(), None);
        assert_eq!(Role::Villager.night_ability(), None);
    }

    #[test]
    fn test_clear_transient() {
        let mut player = Player::new("b".into(), "Bo", Role::Bodyguard, "", "");
        player.set_vote_target("a".into());
        player.set_protected();
        player.clear_transient();
        assert_eq!(player.vote_target(), &None);
        assert!(!player.is_protected());
    }
}
