//! The single mutable game state and its read-only accessors.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use strictly_werewolf::{
    Ledger, LogEntry, Narration, Phase, Player, PlayerId, Viewer, Winner, rules,
};

/// Discussion passes per day unless configured otherwise.
pub const DEFAULT_DISCUSSION_ROUNDS: u32 = 3;

/// Everything the game master tracks.
///
/// Only the game master mutates this; callers receive clones via
/// `GameController::snapshot`.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct GameState {
    /// Players in canonical turn order.
    players: Vec<Player>,
    #[getter(skip)]
    phase: Phase,
    #[getter(skip)]
    day_count: u32,
    #[getter(skip)]
    turn_index: usize,
    #[getter(skip)]
    current_discussion_round: u32,
    #[getter(skip)]
    max_discussion_rounds: u32,
    /// Narration ledger.
    logs: Ledger,
    #[getter(skip)]
    winner: Option<Winner>,
    /// Player whose decision is currently being awaited.
    active_speaker_id: Option<PlayerId>,
    #[getter(skip)]
    generation: u64,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            players: Vec::new(),
            phase: Phase::Setup,
            day_count: 0,
            turn_index: 0,
            current_discussion_round: 1,
            max_discussion_rounds: DEFAULT_DISCUSSION_ROUNDS,
            logs: Ledger::new(),
            winner: None,
            active_speaker_id: None,
            generation: 0,
        }
    }
}

impl GameState {
    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Current day, starting at 1.
    pub fn day_count(&self) -> u32 {
        self.day_count
    }

    /// Position within the current phase's actor list.
    pub fn turn_index(&self) -> usize {
        self.turn_index
    }

    /// Current discussion pass, starting at 1.
    pub fn current_discussion_round(&self) -> u32 {
        self.current_discussion_round
    }

    /// Discussion passes per day.
    pub fn max_discussion_rounds(&self) -> u32 {
        self.max_discussion_rounds
    }

    /// Winning side once the game is over.
    pub fn winner(&self) -> Option<Winner> {
        self.winner
    }

    /// Incremented every time a new game replaces this one.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Looks up a player by id.
    pub fn player(&self, id: &PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id() == id)
    }

    /// Display name for an id, or the raw id if nobody has it.
    pub fn name_of(&self, id: &PlayerId) -> String {
        self.player(id)
            .map(|p| p.name().clone())
            .unwrap_or_else(|| id.to_string())
    }

    /// Length of the actor list for the current phase.
    pub fn actor_count(&self) -> usize {
        match self.phase {
            Phase::DayDiscussion | Phase::DayVote => rules::alive_players(&self.players).len(),
            Phase::NightAction => rules::night_actors(&self.players).len(),
            Phase::Setup | Phase::GameOver => 0,
        }
    }

    /// Log entries a viewer may read.
    pub fn logs_for(&self, viewer: &Viewer) -> Vec<LogEntry> {
        self.logs.view(viewer).cloned().collect()
    }

    pub(crate) fn reset(&mut self, players: Vec<Player>) {
        let max_discussion_rounds = self.max_discussion_rounds;
        let generation = self.generation + 1;
        *self = Self {
            players,
            phase: Phase::Setup,
            day_count: 1,
            max_discussion_rounds,
            generation,
            ..Self::default()
        };
    }

    pub(crate) fn player_mut(&mut self, id: &PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id() == id)
    }

    pub(crate) fn clear_transient(&mut self) {
        self.players.iter_mut().for_each(Player::clear_transient);
    }

    pub(crate) fn narrate(&mut self, narration: Narration) -> u64 {
        self.logs.append(self.phase, self.day_count, narration)
    }

    /// Moves to `phase` with the turn index back at the start.
    pub(crate) fn enter(&mut self, phase: Phase) {
        self.phase = phase;
        self.turn_index = 0;
    }

    pub(crate) fn next_turn(&mut self) {
        self.turn_index += 1;
    }

    pub(crate) fn next_discussion_round(&mut self) {
        self.current_discussion_round += 1;
        self.turn_index = 0;
    }

    pub(crate) fn begin_day(&mut self) {
        self.day_count += 1;
        self.current_discussion_round = 1;
        self.enter(Phase::DayDiscussion);
    }

    pub(crate) fn set_max_discussion_rounds(&mut self, rounds: u32) {
        self.max_discussion_rounds = rounds.max(1);
    }

    pub(crate) fn set_active_speaker(&mut self, id: Option<PlayerId>) {
        self.active_speaker_id = id;
    }

    pub(crate) fn finish(&mut self, winner: Winner) {
        self.winner = Some(winner);
        self.phase = Phase::GameOver;
        self.turn_index = 0;
    }
}
