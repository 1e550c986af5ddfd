//! Phase state machine.
//!
//! Every `advance` is split in two synchronous halves around the one await:
//! [`begin_step`] either resolves a phase boundary on the spot or prepares a
//! [`PendingTurn`] snapshot, and the `finish_*` functions apply the decision
//! that came back. Neither half ever runs more than one unit of work.

use crate::decision::{ActionChoice, DecisionError, TurnContext, TurnTask, validate_choice};
use crate::narration;
use crate::state::GameState;
use rand::Rng;
use strictly_werewolf::{
    NightAbility, NightResult, Narration, Phase, Player, PlayerId, Role, Visibility, VoteOutcome,
    rules,
};
use tracing::{debug, info, instrument, warn};

/// What `begin_step` did.
#[derive(Debug)]
pub(crate) enum Step {
    /// Nothing to do in this phase.
    Idle,
    /// A boundary or skipped turn was applied; no decision needed.
    Resolved,
    /// A decision must be requested before the turn can be applied.
    Turn(PendingTurn),
}

/// A turn waiting on the decision maker.
#[derive(Debug, Clone)]
pub(crate) struct PendingTurn {
    /// Snapshot handed to the decision maker.
    pub context: TurnContext,
    /// Game the turn belongs to.
    pub generation: u64,
}

impl PendingTurn {
    fn actor_id(&self) -> &PlayerId {
        self.context.actor.id()
    }
}

/// Performs the synchronous part of one step.
#[instrument(skip(state), fields(phase = %state.phase(), turn = state.turn_index()))]
pub(crate) fn begin_step(state: &mut GameState) -> Step {
    match state.phase() {
        Phase::Setup | Phase::GameOver => Step::Idle,
        Phase::DayDiscussion => begin_discussion(state),
        Phase::DayVote => begin_vote(state),
        Phase::NightAction => begin_night(state),
    }
}

fn context_for(state: &GameState, actor: &Player, task: TurnTask) -> TurnContext {
    let valid_targets = match task {
        TurnTask::Discuss => Vec::new(),
        TurnTask::Vote | TurnTask::Night(_) => rules::valid_targets(state.players(), actor.id()),
    };
    // Tonight's guard flag and vote picks are not the actor's to know.
    let mut actor = actor.clone();
    actor.clear_transient();
    let history = state.logs().history_for(actor.id());
    TurnContext {
        actor,
        roster: state.players().iter().map(Player::public_profile).collect(),
        history,
        phase: state.phase(),
        day: state.day_count(),
        task,
        valid_targets,
    }
}

fn start_turn(state: &mut GameState, actor: Player, task: TurnTask) -> Step {
    let context = context_for(state, &actor, task);
    if task != TurnTask::Discuss && context.valid_targets.is_empty() {
        warn!(actor = %actor.id(), "No valid targets, skipping turn");
        state.narrate(Narration::failure(
            actor.id().clone(),
            narration::failure::no_targets(),
        ));
        state.next_turn();
        return Step::Resolved;
    }
    debug!(actor = %actor.id(), %task, "Requesting decision");
    state.set_active_speaker(Some(actor.id().clone()));
    Step::Turn(PendingTurn {
        context,
        generation: state.generation(),
    })
}

fn begin_discussion(state: &mut GameState) -> Step {
    let speaker = rules::alive_players(state.players())
        .get(state.turn_index())
        .map(|p| (*p).clone());

    match speaker {
        Some(speaker) => start_turn(state, speaker, TurnTask::Discuss),
        None if state.current_discussion_round() < state.max_discussion_rounds() => {
            state.next_discussion_round();
            info!(round = state.current_discussion_round(), "Next discussion round");
            state.narrate(Narration::system(narration::game::discussion_round(
                state.current_discussion_round(),
                state.max_discussion_rounds(),
            )));
            Step::Resolved
        }
        None => {
            state.enter(Phase::DayVote);
            info!(day = state.day_count(), "Voting begins");
            state.narrate(Narration::system(narration::game::voting_begins()));
            Step::Resolved
        }
    }
}

fn begin_vote(state: &mut GameState) -> Step {
    let voter = rules::alive_players(state.players())
        .get(state.turn_index())
        .map(|p| (*p).clone());

    match voter {
        Some(voter) => start_turn(state, voter, TurnTask::Vote),
        None => {
            resolve_vote(state);
            Step::Resolved
        }
    }
}

fn begin_night(state: &mut GameState) -> Step {
    let actor = rules::night_actors(state.players())
        .get(state.turn_index())
        .map(|p| (*p).clone());

    match actor {
        Some(actor) => match actor.role().night_ability() {
            Some(ability) => start_turn(state, actor, TurnTask::Night(ability)),
            None => {
                state.next_turn();
                Step::Resolved
            }
        },
        None => {
            resolve_night_phase(state);
            Step::Resolved
        }
    }
}

fn is_stale(state: &GameState, turn: &PendingTurn) -> bool {
    if state.generation() != turn.generation {
        warn!(
            expected = turn.generation,
            current = state.generation(),
            "Discarding decision for a replaced game"
        );
        return true;
    }
    false
}

fn end_turn(state: &mut GameState) {
    state.set_active_speaker(None);
    state.next_turn();
}

/// Applies a discussion decision.
#[instrument(skip_all, fields(actor = %turn.actor_id()))]
pub(crate) fn finish_discussion(
    state: &mut GameState,
    turn: &PendingTurn,
    outcome: Result<String, DecisionError>,
) {
    if is_stale(state, turn) {
        return;
    }
    let speaker = turn.actor_id().clone();
    match outcome {
        Ok(text) => {
            state.narrate(Narration::chat(speaker, text));
        }
        Err(e) => {
            state.narrate(Narration::failure(
                speaker,
                narration::failure::discussion(&e.message),
            ));
        }
    }
    end_turn(state);
}

/// Applies a vote or night-action decision.
#[instrument(skip_all, fields(actor = %turn.actor_id(), task = %turn.context.task))]
pub(crate) fn finish_action<R: Rng + ?Sized>(
    state: &mut GameState,
    turn: &PendingTurn,
    outcome: Result<ActionChoice, DecisionError>,
    rng: &mut R,
) {
    if is_stale(state, turn) {
        return;
    }
    let actor = turn.actor_id().clone();
    match outcome {
        Ok(choice) => match validate_choice(choice, &turn.context.valid_targets, rng) {
            Some(choice) => match turn.context.task {
                TurnTask::Night(ability) => record_night_action(state, &actor, ability, choice),
                TurnTask::Vote | TurnTask::Discuss => record_vote(state, &actor, choice),
            },
            None => {
                state.narrate(Narration::failure(actor, narration::failure::no_targets()));
            }
        },
        Err(e) => {
            let notice = match turn.context.task {
                TurnTask::Night(_) => narration::failure::night(&e.message),
                TurnTask::Vote | TurnTask::Discuss => narration::failure::vote(&e.message),
            };
            state.narrate(Narration::failure(actor, notice));
        }
    }
    end_turn(state);
}

fn record_vote(state: &mut GameState, voter: &PlayerId, choice: ActionChoice) {
    let target_name = state.name_of(&choice.target_id);
    debug!(%voter, target = %choice.target_id, "Vote recorded");
    if let Some(player) = state.player_mut(voter) {
        player.set_vote_target(choice.target_id.clone());
    }
    state.narrate(Narration::action(
        voter.clone(),
        narration::vote::cast(&target_name, &choice.reasoning),
    ));
}

fn record_night_action(
    state: &mut GameState,
    actor: &PlayerId,
    ability: NightAbility,
    choice: ActionChoice,
) {
    let target_name = state.name_of(&choice.target_id);
    debug!(%actor, %ability, target = %choice.target_id, "Night action recorded");
    if let Some(player) = state.player_mut(actor) {
        player.set_vote_target(choice.target_id.clone());
    }

    let visibility = match ability {
        NightAbility::Attack => Visibility::group(
            state
                .players()
                .iter()
                .filter(|p| p.is_alive() && p.role().is_werewolf())
                .map(|p| p.id().clone()),
        ),
        NightAbility::Divine | NightAbility::Guard => Visibility::only(actor.clone()),
    };
    state.narrate(
        Narration::action(
            actor.clone(),
            narration::night::action(ability, &target_name, &choice.reasoning),
        )
        .visible_to(visibility),
    );

    match ability {
        NightAbility::Divine => {
            let is_werewolf = state
                .player(&choice.target_id)
                .is_some_and(|p| p.role().is_werewolf());
            state.narrate(
                Narration::action(
                    actor.clone(),
                    narration::night::divination(&target_name, is_werewolf),
                )
                .visible_to(Visibility::only(actor.clone())),
            );
        }
        NightAbility::Guard => {
            if let Some(target) = state.player_mut(&choice.target_id) {
                target.set_protected();
            }
        }
        NightAbility::Attack => {}
    }
}

/// Ends the game if either side has won. The only place a winner is set.
fn conclude_if_won(state: &mut GameState) -> bool {
    match rules::check_winner(state.players()) {
        Some(winner) => {
            info!(%winner, day = state.day_count(), "Game over");
            state.finish(winner);
            state.narrate(Narration::system(narration::victory(winner)));
            true
        }
        None => false,
    }
}

fn kill(state: &mut GameState, victim: &PlayerId) {
    if let Some(player) = state.player_mut(victim) {
        player.kill();
    }
}

#[instrument(skip(state), fields(day = state.day_count()))]
fn resolve_vote(state: &mut GameState) {
    let outcome = rules::tally_votes(state.players());
    match &outcome {
        VoteOutcome::Execute { target, votes } => {
            let name = state.name_of(target);
            info!(victim = %target, votes, "Player executed");
            kill(state, target);
            state.narrate(Narration::death(narration::vote::executed(&name)));
            reveal_to_mediums(state, target, &name);
            if conclude_if_won(state) {
                return;
            }
        }
        VoteOutcome::Tie { .. } | VoteOutcome::NoVotes => {
            info!(?outcome, "No execution");
            state.narrate(Narration::system(narration::vote::split()));
        }
    }

    state.clear_transient();
    state.enter(Phase::NightAction);
    state.narrate(Narration::system(narration::game::night_falls()));
}

fn reveal_to_mediums(state: &mut GameState, executed: &PlayerId, name: &str) {
    let was_werewolf = state
        .player(executed)
        .is_some_and(|p| p.role().is_werewolf());
    let mediums: Vec<PlayerId> = state
        .players()
        .iter()
        .filter(|p| p.is_alive() && p.role() == Role::Medium)
        .map(|p| p.id().clone())
        .collect();
    for medium in mediums {
        state.narrate(
            Narration::action(medium.clone(), narration::vote::medium_reading(name, was_werewolf))
                .visible_to(Visibility::only(medium)),
        );
    }
}

#[instrument(skip(state), fields(day = state.day_count()))]
fn resolve_night_phase(state: &mut GameState) {
    match rules::resolve_night(state.players()) {
        NightResult::Killed(victim) => {
            let name = state.name_of(&victim);
            info!(%victim, "Night kill");
            kill(state, &victim);
            state.narrate(Narration::death(narration::night::killed(&name)));
            if conclude_if_won(state) {
                return;
            }
        }
        NightResult::Protected(target) => {
            let name = state.name_of(&target);
            info!(%target, "Night attack blocked");
            state.narrate(Narration::announcement(narration::night::survived(&name)));
        }
        NightResult::Peaceful => {
            state.narrate(Narration::system(narration::night::peaceful()));
        }
    }

    state.clear_transient();
    state.begin_day();
    info!(day = state.day_count(), "New day");
    state.narrate(Narration::system(narration::game::new_day(state.day_count())));
}
