//! Game controller: owns the state and serializes `advance` calls.

use crate::decision::{DecisionMaker, TurnTask};
use crate::game_config::GameConfig;
use crate::machine::{self, Step};
use crate::narration;
use crate::retry::{RetryPolicy, with_retry};
use crate::setup::{SetupError, seat_players};
use crate::state::{DEFAULT_DISCUSSION_ROUNDS, GameState};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use strictly_werewolf::{Narration, Phase};
use tracing::{debug, info, instrument};

/// Knobs for a controller.
#[derive(Debug, Clone, PartialEq)]
pub struct ControllerOptions {
    /// Table size for `init_game`.
    pub player_count: usize,
    /// Discussion passes per day.
    pub discussion_rounds: u32,
    /// Retry behaviour around decision calls.
    pub retry: RetryPolicy,
    /// Seed for setup shuffles and target substitution; random if absent.
    pub seed: Option<u64>,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            player_count: 5,
            discussion_rounds: DEFAULT_DISCUSSION_ROUNDS,
            retry: RetryPolicy::default(),
            seed: None,
        }
    }
}

impl From<&GameConfig> for ControllerOptions {
    fn from(config: &GameConfig) -> Self {
        Self {
            player_count: *config.player_count(),
            discussion_rounds: *config.discussion_rounds(),
            retry: config.retry().clone(),
            seed: *config.seed(),
        }
    }
}

struct Table {
    state: GameState,
    rng: StdRng,
}

/// Clears the in-flight flag when the step ends, however it ends.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Entry point for the presentation layer.
///
/// Holds the only mutable [`GameState`]. Callers drive the game by calling
/// [`GameController::advance`] repeatedly and read it through
/// [`GameController::snapshot`].
pub struct GameController {
    table: Mutex<Table>,
    in_flight: AtomicBool,
    decider: Arc<dyn DecisionMaker>,
    options: ControllerOptions,
}

impl std::fmt::Debug for GameController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameController")
            .field("options", &self.options)
            .field("busy", &self.is_busy())
            .finish_non_exhaustive()
    }
}

impl GameController {
    /// Creates a controller in the SETUP phase.
    #[instrument(skip(decider))]
    pub fn new(decider: Arc<dyn DecisionMaker>, options: ControllerOptions) -> Self {
        let rng = match options.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut state = GameState::default();
        state.set_max_discussion_rounds(options.discussion_rounds);
        info!("Creating game controller");
        Self {
            table: Mutex::new(Table { state, rng }),
            in_flight: AtomicBool::new(false),
            decider,
            options,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Table> {
        self.table.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Starts a new game, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError`] if the configured table size has no role preset.
    /// The previous state is kept in that case.
    #[instrument(skip(self), fields(players = self.options.player_count))]
    pub fn init_game(&self) -> Result<(), SetupError> {
        let mut table = self.lock();
        let Table { state, rng } = &mut *table;
        let players = seat_players(self.options.player_count, rng)?;
        state.reset(players);
        state.narrate(Narration::system(narration::game::opening()));
        state.enter(Phase::DayDiscussion);
        info!(generation = state.generation(), "Game initialized");
        Ok(())
    }

    /// Sets the number of discussion passes per day (at least 1).
    ///
    /// Takes effect at the next end-of-round check.
    #[instrument(skip(self))]
    pub fn set_discussion_rounds(&self, rounds: u32) {
        self.lock().state.set_max_discussion_rounds(rounds);
    }

    /// Returns a copy of the current state.
    pub fn snapshot(&self) -> GameState {
        self.lock().state.clone()
    }

    /// Returns true while an `advance` call is in progress.
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Performs at most one unit of work.
    ///
    /// Returns immediately if another call is in progress or the game is in
    /// SETUP or GAME_OVER. Decision failures end up in the log, never here.
    #[instrument(skip(self))]
    pub async fn advance(&self) {
        let Some(_in_flight) = InFlight::acquire(&self.in_flight) else {
            debug!("Advance already in progress, ignoring");
            return;
        };

        let step = {
            let mut table = self.lock();
            machine::begin_step(&mut table.state)
        };

        let turn = match step {
            Step::Idle | Step::Resolved => return,
            Step::Turn(turn) => turn,
        };

        let decider = self.decider.as_ref();
        let context = &turn.context;
        match context.task {
            TurnTask::Discuss => {
                let outcome =
                    with_retry(&self.options.retry, "discussion", move || decider.discuss(context))
                        .await;
                let mut table = self.lock();
                machine::finish_discussion(&mut table.state, &turn, outcome);
            }
            TurnTask::Vote | TurnTask::Night(_) => {
                let outcome =
                    with_retry(&self.options.retry, "action", move || decider.act(context)).await;
                let mut table = self.lock();
                let Table { state, rng } = &mut *table;
                machine::finish_action(state, &turn, outcome, rng);
            }
        }
    }
}
