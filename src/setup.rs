//! Table setup: roles, names, avatars and personalities.

use derive_more::{Display, Error};
use rand::Rng;
use rand::seq::SliceRandom;
use strictly_werewolf::{Player, PlayerId, catalog};
use tracing::{debug, info, instrument};

/// Display names, drawn without replacement.
pub const NAMES: [&str; 8] = [
    "Sato", "Suzuki", "Takahashi", "Tanaka", "Ito", "Watanabe", "Yamamoto", "Nakamura",
];

/// Avatar URLs, drawn without replacement.
pub const AVATARS: [&str; 8] = [
    "https://picsum.photos/seed/p1/100/100",
    "https://picsum.photos/seed/p2/100/100",
    "https://picsum.photos/seed/p3/100/100",
    "https://picsum.photos/seed/p4/100/100",
    "https://picsum.photos/seed/p5/100/100",
    "https://picsum.photos/seed/p6/100/100",
    "https://picsum.photos/seed/p7/100/100",
    "https://picsum.photos/seed/p8/100/100",
];

/// Personalities, drawn without replacement.
pub const PERSONALITIES: [&str; 8] = [
    "Logical and calm. Focuses on facts.",
    "Emotional and aggressive. Quick to suspect others.",
    "Quiet and observant. Says little, but cuts to the heart of things.",
    "Chaotic and unpredictable. Changes opinion often.",
    "A natural leader who tries to pull the group together.",
    "Suspicious by nature. Trusts nobody.",
    "Friendly but defensive. Wants to keep the peace.",
    "Analytical. Good at spotting contradictions in what people say.",
];

/// Setup failure.
#[derive(Debug, Clone, Display, Error)]
#[display("Setup error: {} at {}:{}", message, file, line)]
pub struct SetupError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl SetupError {
    /// Creates a new setup error.
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

/// Random UUID drawn from `rng`, so a seeded table gets the same ids.
fn player_id<R: Rng + ?Sized>(rng: &mut R) -> PlayerId {
    let mut bytes = [0u8; 16];
    rng.fill_bytes(&mut bytes);
    PlayerId::new(uuid::Builder::from_random_bytes(bytes).into_uuid().to_string())
}

fn draw<'a, R: Rng + ?Sized>(pool: &[&'a str], count: usize, rng: &mut R) -> Vec<&'a str> {
    let mut drawn = pool.to_vec();
    drawn.shuffle(rng);
    drawn.truncate(count);
    drawn
}

/// Seats `player_count` players with shuffled roles and distinct cosmetics.
#[instrument(skip(rng))]
pub fn seat_players<R: Rng + ?Sized>(
    player_count: usize,
    rng: &mut R,
) -> Result<Vec<Player>, SetupError> {
    let preset = catalog::roles_for(player_count).ok_or_else(|| {
        SetupError::new(format!(
            "No role preset for {} players (supported: {:?})",
            player_count,
            catalog::supported_player_counts()
        ))
    })?;

    let pool_size = NAMES.len().min(AVATARS.len()).min(PERSONALITIES.len());
    if preset.len() > pool_size {
        return Err(SetupError::new(format!(
            "{} players exceed the identity pool of {}",
            preset.len(),
            pool_size
        )));
    }

    let mut roles = preset.to_vec();
    roles.shuffle(rng);
    let names = draw(&NAMES, roles.len(), rng);
    let avatars = draw(&AVATARS, roles.len(), rng);
    let personalities = draw(&PERSONALITIES, roles.len(), rng);

    let players: Vec<Player> = roles
        .into_iter()
        .enumerate()
        .map(|(i, role)| {
            let id = player_id(rng);
            debug!(%id, name = names[i], ?role, "Seating player");
            Player::new(id, names[i], role, personalities[i], avatars[i])
        })
        .collect();

    info!(count = players.len(), "Players seated");
    Ok(players)
}
