//! Werewolf game master for LLM-played games.
//!
//! A [`GameController`] owns the one mutable [`GameState`] and advances it one
//! unit of work per [`GameController::advance`] call. Players are driven by a
//! [`DecisionMaker`]: the [`LlmAgent`] prompts a chat model with the seat's
//! private view, the [`ScriptedAgent`] plays offline.
//!
//! # Architecture
//!
//! - **Rules**: pure game logic lives in the `strictly_werewolf` crate
//! - **Machine**: one step of discussion, vote or night at a time
//! - **Controller**: re-entrancy guard, retry and state ownership
//! - **Agents**: decision makers behind an async trait
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use werewolf_gm::{ControllerOptions, GameController, ScriptedAgent};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let controller = GameController::new(
//!     Arc::new(ScriptedAgent::new(7)),
//!     ControllerOptions::default(),
//! );
//! controller.init_game()?;
//! while controller.snapshot().winner().is_none() {
//!     controller.advance().await;
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod agents;
mod controller;
mod decision;
mod machine;
mod narration;
mod setup;
mod state;

// Public modules
pub mod game_config;
pub mod llm_client;
pub mod retry;

// Crate-level exports - Agents
pub use agents::{LlmAgent, ScriptedAgent, parse_action, parse_speech};

// Crate-level exports - Controller
pub use controller::{ControllerOptions, GameController};

// Crate-level exports - Decision contract
pub use decision::{
    AUTO_CORRECTED, ActionChoice, DecisionError, DecisionMaker, TurnContext, TurnTask,
    validate_choice,
};

// Crate-level exports - Setup and state
pub use setup::{AVATARS, NAMES, PERSONALITIES, SetupError, seat_players};
pub use state::{DEFAULT_DISCUSSION_ROUNDS, GameState};

// Crate-level exports - Configuration
pub use game_config::{ConfigError, GameConfig};
pub use llm_client::{LlmClient, LlmConfig, LlmError, LlmProvider};
pub use retry::{RetryPolicy, with_retry};

// Crate-level exports - Game types
pub use strictly_werewolf::{
    GAME_MASTER_ID, LogEntry, LogKind, NightAbility, Phase, Player, PlayerId, PublicProfile,
    Role, Speaker, Team, Viewer, Visibility, Winner,
};
