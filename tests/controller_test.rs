//! Controller lifecycle and re-entrancy.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Notify;
use werewolf_gm::{
    ActionChoice, ControllerOptions, DecisionError, DecisionMaker, GameController, LogKind, Phase,
    RetryPolicy, ScriptedAgent, TurnContext, Viewer,
};

/// Holds every discussion call until released.
#[derive(Default)]
struct Gate {
    release: Notify,
    calls: AtomicUsize,
}

#[async_trait::async_trait]
impl DecisionMaker for Gate {
    async fn discuss(&self, context: &TurnContext) -> Result<String, DecisionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.release.notified().await;
        Ok(format!("{} finally speaks.", context.actor.name()))
    }

    async fn act(&self, context: &TurnContext) -> Result<ActionChoice, DecisionError> {
        Ok(ActionChoice::new(context.valid_targets[0].clone(), "first"))
    }
}

fn options() -> ControllerOptions {
    ControllerOptions {
        retry: RetryPolicy::immediate(1),
        seed: Some(3),
        ..ControllerOptions::default()
    }
}

async fn wait_until_busy(controller: &GameController) {
    while !controller.is_busy() {
        tokio::task::yield_now().await;
    }
}

#[tokio::test]
async fn test_advance_is_ignored_while_in_flight() {
    let gate = Arc::new(Gate::default());
    let controller = Arc::new(GameController::new(gate.clone(), options()));
    controller.init_game().expect("init");
    let before = controller.snapshot();
    let first_speaker = before.players()[0].id().clone();

    let pending = tokio::spawn({
        let controller = controller.clone();
        async move { controller.advance().await }
    });
    wait_until_busy(&controller).await;

    let during = controller.snapshot();
    assert_eq!(during.active_speaker_id(), &Some(first_speaker.clone()));

    // A second call while the first is awaiting does nothing.
    controller.advance().await;
    assert_eq!(gate.calls.load(Ordering::SeqCst), 1);
    assert_eq!(controller.snapshot().logs().len(), before.logs().len());

    gate.release.notify_one();
    pending.await.expect("advance task");

    let after = controller.snapshot();
    assert!(!controller.is_busy());
    assert_eq!(after.logs().len(), before.logs().len() + 1);
    let last = after.logs().last().expect("entry");
    assert_eq!(*last.kind(), LogKind::Chat);
    assert_eq!(last.speaker().player(), Some(&first_speaker));
    assert_eq!(after.turn_index(), 1);
    assert_eq!(after.active_speaker_id(), &None);
}

#[tokio::test]
async fn test_decision_for_replaced_game_is_discarded() {
    let gate = Arc::new(Gate::default());
    let controller = Arc::new(GameController::new(gate.clone(), options()));
    controller.init_game().expect("init");

    let pending = tokio::spawn({
        let controller = controller.clone();
        async move { controller.advance().await }
    });
    wait_until_busy(&controller).await;

    controller.init_game().expect("re-init");
    gate.release.notify_one();
    pending.await.expect("advance task");

    let state = controller.snapshot();
    assert_eq!(state.generation(), 2);
    assert_eq!(state.logs().len(), 1, "only the opening of the new game");
    assert_eq!(state.turn_index(), 0);
    assert_eq!(state.phase(), Phase::DayDiscussion);
}

#[tokio::test]
async fn test_init_game_resets_everything() {
    let controller = GameController::new(Arc::new(ScriptedAgent::new(5)), options());
    assert_eq!(controller.snapshot().phase(), Phase::Setup);

    // Nothing happens before a game exists.
    controller.advance().await;
    assert!(controller.snapshot().logs().is_empty());

    controller.init_game().expect("init");
    for _ in 0..4 {
        controller.advance().await;
    }
    let first = controller.snapshot();
    assert!(first.logs().len() > 1);

    controller.init_game().expect("re-init");
    let state = controller.snapshot();
    assert_eq!(state.phase(), Phase::DayDiscussion);
    assert_eq!(state.day_count(), 1);
    assert_eq!(state.turn_index(), 0);
    assert_eq!(state.current_discussion_round(), 1);
    assert_eq!(state.players().len(), 5);
    assert!(state.players().iter().all(|p| p.is_alive()));
    assert_eq!(state.winner(), None);
    assert_eq!(state.logs().len(), 1);
    assert_eq!(state.logs_for(&Viewer::Public).len(), 1);
    assert_eq!(*state.logs().entries()[0].kind(), LogKind::System);
}

#[tokio::test]
async fn test_unsupported_table_size_keeps_previous_state() {
    let controller = GameController::new(
        Arc::new(ScriptedAgent::new(5)),
        ControllerOptions {
            player_count: 6,
            ..options()
        },
    );
    assert!(controller.init_game().is_err());
    let state = controller.snapshot();
    assert_eq!(state.phase(), Phase::Setup);
    assert!(state.players().is_empty());
}

#[tokio::test]
async fn test_discussion_rounds_are_clamped_and_applied() {
    let controller = GameController::new(Arc::new(ScriptedAgent::new(9)), options());
    controller.init_game().expect("init");
    controller.set_discussion_rounds(0);
    assert_eq!(controller.snapshot().max_discussion_rounds(), 1);

    // One pass of five speakers, then the vote begins.
    for _ in 0..6 {
        controller.advance().await;
    }
    let state = controller.snapshot();
    assert_eq!(state.phase(), Phase::DayVote);
    let chats = state
        .logs()
        .entries()
        .iter()
        .filter(|e| *e.kind() == LogKind::Chat)
        .count();
    assert_eq!(chats, 5);
}

#[tokio::test]
async fn test_scripted_game_finishes() {
    let controller = GameController::new(
        Arc::new(ScriptedAgent::new(21)),
        ControllerOptions {
            player_count: 7,
            discussion_rounds: 2,
            ..options()
        },
    );
    controller.init_game().expect("init");

    for _ in 0..1000 {
        if controller.snapshot().winner().is_some() {
            break;
        }
        controller.advance().await;
    }

    let state = controller.snapshot();
    assert_eq!(state.phase(), Phase::GameOver);
    let winner = state.winner().expect("winner");
    let wolves = state
        .players()
        .iter()
        .filter(|p| p.is_alive() && p.role().is_werewolf())
        .count();
    let humans = state.players().iter().filter(|p| p.is_alive()).count() - wolves;
    match winner {
        werewolf_gm::Winner::Villagers => assert_eq!(wolves, 0),
        werewolf_gm::Winner::Werewolves => assert!(wolves >= humans),
    }
}

#[tokio::test]
async fn test_every_advance_is_one_bounded_step() {
    let controller = GameController::new(
        Arc::new(ScriptedAgent::new(77)),
        ControllerOptions {
            player_count: 7,
            discussion_rounds: 2,
            ..options()
        },
    );
    controller.init_game().expect("init");

    let mut steps = 0;
    while controller.snapshot().winner().is_none() {
        assert!(steps < 1000, "game did not finish");
        let before = controller.snapshot();
        controller.advance().await;
        let after = controller.snapshot();
        steps += 1;

        assert!(
            after.turn_index() <= after.actor_count(),
            "turn index {} past {} actors in {}",
            after.turn_index(),
            after.actor_count(),
            after.phase()
        );

        let boundary = before.phase() != after.phase()
            || before.day_count() != after.day_count()
            || before.current_discussion_round() != after.current_discussion_round();
        let added = after.logs().len() - before.logs().len();
        if boundary {
            assert!(added >= 1, "boundary step left no narration");
            assert_eq!(after.turn_index(), 0);
            continue;
        }

        assert_eq!(after.turn_index(), before.turn_index() + 1);
        match added {
            1 => {}
            2 => {
                let last = after.logs().last().expect("entry");
                assert!(last.content().starts_with("(Divination)"));
                assert!(!last.visibility().is_public());
            }
            n => panic!("turn step added {n} entries"),
        }
    }

    assert_eq!(controller.snapshot().phase(), Phase::GameOver);
}
