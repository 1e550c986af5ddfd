//! Game master configuration loaded from TOML.

use crate::llm_client::{LlmConfig, LlmProvider};
use crate::retry::RetryPolicy;
use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, instrument};

/// Configuration for a game and the agents playing it.
#[derive(Debug, Clone, PartialEq, Getters, Serialize, Deserialize)]
pub struct GameConfig {
    /// Table size; must match a role preset (5 or 7).
    #[serde(default = "default_player_count")]
    player_count: usize,

    /// Discussion passes per day before voting.
    #[serde(default = "default_discussion_rounds")]
    discussion_rounds: u32,

    /// LLM provider (openai, anthropic or gemini).
    #[serde(default = "default_provider")]
    llm_provider: LlmProvider,

    /// LLM model name (e.g., "gemini-2.5-flash", "gpt-4o-mini").
    #[serde(default = "default_model")]
    llm_model: String,

    /// Maximum tokens for LLM responses.
    #[serde(default = "default_max_tokens")]
    llm_max_tokens: u32,

    /// How many of the most recent visible log entries agents are shown.
    #[serde(default = "default_history_window")]
    history_window: usize,

    /// Seed for role shuffling and target substitution.
    #[serde(default)]
    seed: Option<u64>,

    /// Retry behaviour around decision calls.
    #[serde(default)]
    retry: RetryPolicy,
}

fn default_player_count() -> usize {
    5
}

fn default_discussion_rounds() -> u32 {
    3
}

fn default_provider() -> LlmProvider {
    LlmProvider::Gemini
}

fn default_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_max_tokens() -> u32 {
    300
}

fn default_history_window() -> usize {
    50
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            player_count: default_player_count(),
            discussion_rounds: default_discussion_rounds(),
            llm_provider: default_provider(),
            llm_model: default_model(),
            llm_max_tokens: default_max_tokens(),
            history_window: default_history_window(),
            seed: None,
            retry: RetryPolicy::default(),
        }
    }
}

impl GameConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config = Self::from_toml(&content)?;
        info!(
            player_count = config.player_count,
            provider = ?config.llm_provider,
            "Config loaded successfully"
        );
        Ok(config)
    }

    /// Parses configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))
    }

    /// Overrides the table size.
    pub fn with_player_count(mut self, player_count: usize) -> Self {
        self.player_count = player_count;
        self
    }

    /// Overrides the number of discussion rounds.
    pub fn with_discussion_rounds(mut self, rounds: u32) -> Self {
        self.discussion_rounds = rounds;
        self
    }

    /// Overrides the LLM provider.
    pub fn with_provider(mut self, provider: LlmProvider) -> Self {
        self.llm_provider = provider;
        self
    }

    /// Overrides the seed.
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Overrides the retry policy.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Creates LLM configuration from this game config.
    /// Requires the provider's API key environment variable.
    #[instrument(skip(self), fields(provider = ?self.llm_provider, model = %self.llm_model))]
    pub fn create_llm_config(&self) -> Result<LlmConfig, ConfigError> {
        debug!("Creating LLM config");
        let var = self.llm_provider.api_key_var();
        let api_key = std::env::var(var)
            .map_err(|_| ConfigError::new(format!("{} environment variable not set", var)))?;

        Ok(LlmConfig::new(
            self.llm_provider,
            api_key,
            self.llm_model.clone(),
            self.llm_max_tokens,
        ))
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
