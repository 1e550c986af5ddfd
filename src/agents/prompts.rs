//! Prompt construction and reply parsing for LLM-backed players.

use crate::decision::{ActionChoice, DecisionError, TurnContext, TurnTask};
use serde::Deserialize;
use strictly_werewolf::{LogKind, NightAbility, Phase, Player, Role, Speaker};
use tracing::warn;

fn role_description(role: Role) -> &'static str {
    match role {
        Role::Werewolf => {
            "You are a WEREWOLF. Goal: stay hidden and defeat the village. \
             Deceive the villagers and work with any fellow werewolves."
        }
        Role::Seer => {
            "You are the SEER. Goal: find the werewolves. Each night you learn \
             whether one player is a werewolf. Timing your reveal matters."
        }
        Role::Bodyguard => {
            "You are the BODYGUARD. Goal: protect the village. Each night you \
             guard one player from the attack. You cannot guard yourself."
        }
        Role::Medium => {
            "You are the MEDIUM. Goal: learn the truth about the dead. You find \
             out whether each executed player was a werewolf."
        }
        Role::Villager => {
            "You are a VILLAGER. You have no special ability. Find contradictions \
             in the discussion and expose the werewolves."
        }
    }
}

fn task_description(task: TurnTask) -> &'static str {
    match task {
        TurnTask::Discuss => "Say one or two short sentences in the day discussion.",
        TurnTask::Vote => {
            "Choose one player to execute. Pick whoever seems most likely to be a \
             werewolf given the discussion. If you are a werewolf, vote strategically."
        }
        TurnTask::Night(NightAbility::Attack) => {
            "Choose one player to attack tonight. Key village roles such as the seer \
             are the usual targets."
        }
        TurnTask::Night(NightAbility::Divine) => {
            "Choose one player to divine tonight. Pick someone whose allegiance you \
             want to learn."
        }
        TurnTask::Night(NightAbility::Guard) => {
            "Choose one player to guard tonight. Pick someone the werewolves are \
             likely to attack."
        }
    }
}

/// Describes the game as the acting player sees it.
pub(crate) fn situation(context: &TurnContext, history_window: usize) -> String {
    let alive: Vec<String> = context
        .roster
        .iter()
        .filter(|p| p.is_alive)
        .map(|p| format!("ID:{} Name:{}", p.id, p.name))
        .collect();

    let skip = context.history.len().saturating_sub(history_window);
    let history: Vec<String> = context
        .history
        .iter()
        .skip(skip)
        .map(|entry| {
            let time = if entry.phase().is_night() { "Night" } else { "Day" };
            let who = match (entry.kind(), entry.speaker()) {
                (LogKind::System | LogKind::Death, _) | (_, Speaker::GameMaster) => {
                    "System".to_string()
                }
                (_, Speaker::Player(id)) => context
                    .profile(id)
                    .map(|p| p.name.clone())
                    .unwrap_or_else(|| "Unknown".to_string()),
            };
            format!("[Day {}/{}] [{}]: {}", entry.day(), time, who, entry.content())
        })
        .collect();

    let phase = match context.phase {
        Phase::DayDiscussion => "day discussion",
        Phase::DayVote => "day vote",
        Phase::NightAction => "night",
        Phase::Setup | Phase::GameOver => "between games",
    };

    format!(
        "## Current situation\nDay: {}\nPhase: {}\n\n## Players alive\n{}\n\n## Recent log (oldest first)\n{}",
        context.day,
        phase,
        alive.join("\n"),
        history.join("\n")
    )
}

/// System prompt for a discussion turn.
pub(crate) fn discussion_system(actor: &Player) -> String {
    format!(
        "This is a fictional game of werewolf. You play the character \"{name}\".\n\n\
         ## Character\nRole: {role}\nPersonality: {personality}\n{description}\n\n\
         ## Instructions\n\
         - Read what the others said and respond in context.\n\
         - Point out contradictions, defend yourself, or agree, so the conversation flows.\n\
         - {task}\n\
         - Wrap your line in <speech></speech> tags.",
        name = actor.name(),
        role = actor.role(),
        personality = actor.personality(),
        description = role_description(actor.role()),
        task = task_description(TurnTask::Discuss),
    )
}

/// Closing instruction for a discussion turn.
pub(crate) fn discussion_request(actor: &Player) -> String {
    format!(
        "Given the log above, speak as {}. Wrap your line in <speech> tags.",
        actor.name()
    )
}

/// System prompt for a vote or night action.
pub(crate) fn action_system(context: &TurnContext) -> String {
    let targets: Vec<&str> = context.valid_targets.iter().map(|id| id.as_str()).collect();
    format!(
        "You are \"{name}\".\nRole: {role}\nPersonality: {personality}\n{description}\n\n\
         ## Valid target IDs\n{targets:?}\n\n\
         ## Task\n{task}\n\n\
         ## Output\nReply with only this JSON object:\n\
         {{\"target\": \"<target ID>\", \"reason\": \"<your reason>\"}}",
        name = context.actor.name(),
        role = context.actor.role(),
        personality = context.actor.personality(),
        description = role_description(context.actor.role()),
        task = task_description(context.task),
    )
}

fn clean(text: &str) -> String {
    text.replace('`', "").trim().to_string()
}

/// Extracts the spoken line from a discussion reply.
///
/// Uses the text inside `<speech>` tags when present, otherwise the whole reply.
pub fn parse_speech(raw: &str) -> Result<String, DecisionError> {
    let inner = raw
        .split_once("<speech>")
        .and_then(|(_, rest)| rest.split_once("</speech>"))
        .map(|(speech, _)| speech);

    let speech = match inner {
        Some(speech) => clean(speech),
        None => {
            warn!(raw, "No <speech> tags in reply, using raw text");
            clean(raw)
        }
    };

    if speech.is_empty() {
        return Err(DecisionError::new("Empty discussion reply".to_string()));
    }
    Ok(speech)
}

#[derive(Deserialize)]
struct RawAction {
    target: String,
    reason: String,
}

/// Parses a `{"target": ..., "reason": ...}` reply.
///
/// Tolerates surrounding prose or code fences. The target is not validated
/// here; the game master does that.
pub fn parse_action(raw: &str) -> Result<ActionChoice, DecisionError> {
    let json = match (raw.find('{'), raw.rfind('}')) {
        (Some(start), Some(end)) if start < end => &raw[start..=end],
        _ => {
            return Err(DecisionError::new(format!(
                "No JSON object in action reply: {}",
                raw
            )));
        }
    };

    let action: RawAction = serde_json::from_str(json)
        .map_err(|e| DecisionError::new(format!("Malformed action reply: {}", e)))?;

    Ok(ActionChoice::new(clean(&action.target), clean(&action.reason)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use strictly_werewolf::{PlayerId, PublicProfile};

    #[test]
    fn test_speech_tags_are_stripped() {
        let reply = "Sure!\n<speech>\n  I trust `Sato` for now. \n</speech>";
        assert_eq!(parse_speech(reply).expect("speech"), "I trust Sato for now.");
    }

    #[test]
    fn test_speech_without_tags_falls_back_to_raw() {
        assert_eq!(parse_speech("  Hello all.  ").expect("speech"), "Hello all.");
        assert!(parse_speech("<speech> </speech>").is_err());
    }

    #[test]
    fn test_action_json_in_code_fence() {
        let reply = "```json\n{\"target\": \"abc\", \"reason\": \"too quiet\"}\n```";
        let choice = parse_action(reply).expect("action");
        assert_eq!(choice.target_id, PlayerId::from("abc"));
        assert_eq!(choice.reasoning, "too quiet");
    }

    #[test]
    fn test_action_without_json_fails() {
        assert!(parse_action("I pick Sato").is_err());
        assert!(parse_action("{\"target\": 3}").is_err());
    }

    #[test]
    fn test_situation_lists_only_alive_and_windowed_history() {
        let actor = Player::new("a".into(), "Ann", Role::Seer, "calm", "");
        let mut ledger = strictly_werewolf::Ledger::new();
        for i in 0..5 {
            ledger.append(
                Phase::DayDiscussion,
                1,
                strictly_werewolf::Narration::chat("b".into(), format!("line {i}")),
            );
        }
        let context = TurnContext {
            actor: actor.clone(),
            roster: vec![
                actor.public_profile(),
                PublicProfile {
                    id: "b".into(),
                    name: "Bo".into(),
                    is_alive: true,
                    personality: String::new(),
                },
                PublicProfile {
                    id: "c".into(),
                    name: "Cy".into(),
                    is_alive: false,
                    personality: String::new(),
                },
            ],
            history: ledger.entries().to_vec(),
            phase: Phase::DayDiscussion,
            day: 1,
            task: TurnTask::Discuss,
            valid_targets: Vec::new(),
        };

        let text = situation(&context, 2);
        assert!(text.contains("Name:Bo"));
        assert!(!text.contains("Name:Cy"));
        assert!(text.contains("[Bo]: line 4"));
        assert!(text.contains("line 3"));
        assert!(!text.contains("line 2"));
    }
}
