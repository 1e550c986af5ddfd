//! Narrated log entries.

use crate::types::{Phase, PlayerId};
use derive_getters::Getters;
use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Reserved speaker id for the game master.
pub const GAME_MASTER_ID: &str = "GAME_MASTER";

/// Kind of narration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogKind {
    /// Game master announcements and error notices.
    #[display("system")]
    System,
    /// A player's discussion line.
    #[display("chat")]
    Chat,
    /// A vote or night action.
    #[display("action")]
    Action,
    /// A player died.
    #[display("death")]
    Death,
}

/// Who produced an entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Speaker {
    /// The moderator.
    GameMaster,
    /// A seated player.
    Player(PlayerId),
}

impl Speaker {
    /// Returns the speaker id, using [`GAME_MASTER_ID`] for the moderator.
    pub fn id(&self) -> &str {
        match self {
            Speaker::GameMaster => GAME_MASTER_ID,
            Speaker::Player(id) => id.as_str(),
        }
    }

    /// Returns the player id when the speaker is a player.
    pub fn player(&self) -> Option<&PlayerId> {
        match self {
            Speaker::GameMaster => None,
            Speaker::Player(id) => Some(id),
        }
    }
}

/// Who may read an entry.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Visibility {
    /// Everyone.
    #[default]
    Public,
    /// Only the listed players.
    Only(BTreeSet<PlayerId>),
}

impl Visibility {
    /// Scope to a single player.
    pub fn only(id: PlayerId) -> Self {
        Visibility::Only(BTreeSet::from([id]))
    }

    /// Scope to a set of players.
    pub fn group(ids: impl IntoIterator<Item = PlayerId>) -> Self {
        Visibility::Only(ids.into_iter().collect())
    }

    /// Returns true if the entry is unscoped.
    pub fn is_public(&self) -> bool {
        matches!(self, Visibility::Public)
    }

    /// Returns true if `id` may read the entry.
    pub fn admits(&self, id: &PlayerId) -> bool {
        match self {
            Visibility::Public => true,
            Visibility::Only(ids) => ids.contains(id),
        }
    }
}

/// Narration to be appended. The ledger stamps phase, day and sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Narration {
    /// Text.
    pub content: String,
    /// Kind.
    pub kind: LogKind,
    /// Author.
    pub speaker: Speaker,
    /// Scope.
    pub visibility: Visibility,
}

impl Narration {
    /// A public game-master system announcement.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            kind: LogKind::System,
            speaker: Speaker::GameMaster,
            visibility: Visibility::Public,
        }
    }

    /// A public game-master death announcement.
    pub fn death(content: impl Into<String>) -> Self {
        Self {
            kind: LogKind::Death,
            ..Self::system(content)
        }
    }

    /// A public game-master action announcement.
    pub fn announcement(content: impl Into<String>) -> Self {
        Self {
            kind: LogKind::Action,
            ..Self::system(content)
        }
    }

    /// A public chat line from a player.
    pub fn chat(speaker: PlayerId, content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            kind: LogKind::Chat,
            speaker: Speaker::Player(speaker),
            visibility: Visibility::Public,
        }
    }

    /// A public action line from a player.
    pub fn action(speaker: PlayerId, content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            kind: LogKind::Action,
            speaker: Speaker::Player(speaker),
            visibility: Visibility::Public,
        }
    }

    /// A system notice attributed to a player, scoped to that player.
    pub fn failure(speaker: PlayerId, content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            kind: LogKind::System,
            visibility: Visibility::only(speaker.clone()),
            speaker: Speaker::Player(speaker),
        }
    }

    /// Restricts who may read this narration.
    pub fn visible_to(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }
}

/// An immutable ledger entry.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct LogEntry {
    /// Position in the ledger.
    seq: u64,
    /// Phase when the entry was written.
    phase: Phase,
    /// Day when the entry was written.
    day: u32,
    /// Narration text.
    content: String,
    /// Entry kind.
    kind: LogKind,
    /// Author.
    speaker: Speaker,
    /// Scope.
    visibility: Visibility,
}

impl LogEntry {
    pub(crate) fn stamp(seq: u64, phase: Phase, day: u32, narration: Narration) -> Self {
        Self {
            seq,
            phase,
            day,
            content: narration.content,
            kind: narration.kind,
            speaker: narration.speaker,
            visibility: narration.visibility,
        }
    }

    /// Returns true if `id` may read this entry.
    pub fn is_visible_to(&self, id: &PlayerId) -> bool {
        self.visibility.admits(id)
    }
}
