//! Decision maker backed by an LLM.

use super::prompts;
use crate::decision::{ActionChoice, DecisionError, DecisionMaker, TurnContext};
use crate::game_config::{ConfigError, GameConfig};
use crate::llm_client::LlmClient;
use tracing::{debug, info, instrument};

/// Temperature for free-form discussion.
const DISCUSSION_TEMPERATURE: f32 = 0.8;

/// Temperature for target picks.
const ACTION_TEMPERATURE: f32 = 0.5;

/// Plays every seat by prompting an LLM with that seat's view of the game.
#[derive(Debug, Clone)]
pub struct LlmAgent {
    client: LlmClient,
    history_window: usize,
}

impl LlmAgent {
    /// Creates an agent that shows the model at most `history_window` log entries.
    pub fn new(client: LlmClient, history_window: usize) -> Self {
        Self {
            client,
            history_window,
        }
    }

    /// Builds an agent from game configuration and the provider's API key.
    pub fn from_config(config: &GameConfig) -> Result<Self, ConfigError> {
        let client = LlmClient::new(config.create_llm_config()?);
        info!(
            provider = %client.config().provider(),
            model = client.config().model(),
            max_tokens = client.config().max_tokens(),
            history_window = config.history_window(),
            "LLM agent ready"
        );
        Ok(Self::new(client, *config.history_window()))
    }

    async fn complete(
        &self,
        system_prompt: &str,
        user_message: &str,
        temperature: f32,
    ) -> Result<String, DecisionError> {
        self.client
            .generate(system_prompt, user_message, temperature)
            .await
            .map_err(|e| DecisionError::new(e.message))
    }
}

#[async_trait::async_trait]
impl DecisionMaker for LlmAgent {
    #[instrument(skip_all, fields(actor = %context.actor.name(), day = context.day))]
    async fn discuss(&self, context: &TurnContext) -> Result<String, DecisionError> {
        let system_prompt = prompts::discussion_system(&context.actor);
        let user_message = format!(
            "{}\n\n{}",
            prompts::situation(context, self.history_window),
            prompts::discussion_request(&context.actor)
        );
        let raw = self
            .complete(&system_prompt, &user_message, DISCUSSION_TEMPERATURE)
            .await?;
        debug!(raw_length = raw.len(), "Discussion reply received");
        prompts::parse_speech(&raw)
    }

    #[instrument(skip_all, fields(actor = %context.actor.name(), task = %context.task))]
    async fn act(&self, context: &TurnContext) -> Result<ActionChoice, DecisionError> {
        let system_prompt = prompts::action_system(context);
        let user_message = format!(
            "{}\n\nDecide on a target and your reason, as JSON.",
            prompts::situation(context, self.history_window)
        );
        let raw = self
            .complete(&system_prompt, &user_message, ACTION_TEMPERATURE)
            .await?;
        debug!(raw_length = raw.len(), "Action reply received");
        prompts::parse_action(&raw)
    }
}
