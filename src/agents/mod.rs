//! Decision makers that play the seats.

mod llm;
mod prompts;
mod scripted;

pub use llm::LlmAgent;
pub use prompts::{parse_action, parse_speech};
pub use scripted::ScriptedAgent;
