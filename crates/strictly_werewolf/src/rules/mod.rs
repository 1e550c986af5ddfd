//! Game rules for werewolf.
//!
//! Pure functions over the player list. They never mutate state; the game
//! master applies their results and writes the narration.

pub mod night;
pub mod roster;
pub mod tally;
pub mod win;

pub use night::{NightResult, majority_target, resolve_night};
pub use roster::{alive_players, night_actors, valid_targets};
pub use tally::{VoteOutcome, count_votes, tally_votes};
pub use win::check_winner;
