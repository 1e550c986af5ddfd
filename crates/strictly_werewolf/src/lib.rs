//! Pure werewolf game logic.
//!
//! Players and roles, the append-only narration ledger, and the rules that
//! tally votes, resolve the night and decide the winner. Nothing here is
//! async or performs I/O; the game master in `werewolf_gm` sequences these
//! pieces.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod catalog;
mod ledger;
mod log;
pub mod rules;
mod types;

pub use ledger::{Ledger, Viewer};
pub use log::{GAME_MASTER_ID, LogEntry, LogKind, Narration, Speaker, Visibility};
pub use rules::{NightResult, VoteOutcome};
pub use types::{NightAbility, Phase, Player, PlayerId, PublicProfile, Role, Team, Winner};
