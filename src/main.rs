//! Werewolf game master - command-line runner.

#![warn(missing_docs)]

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument, warn};
use tracing_subscriber::EnvFilter;
use werewolf_gm::{
    ControllerOptions, DecisionMaker, GameConfig, GameController, GameState, LlmAgent,
    LlmProvider, LogEntry, LogKind, ScriptedAgent, Speaker, Viewer,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Play {
            config,
            players,
            rounds,
            seed,
            provider,
            offline,
            reveal,
            max_steps,
        } => {
            let config = load_config(&config, players, rounds, seed, provider)?;
            run_game(config, offline, reveal, max_steps).await
        }
    }
}

/// Loads the config file if present and applies command-line overrides.
fn load_config(
    path: &Path,
    players: Option<usize>,
    rounds: Option<u32>,
    seed: Option<u64>,
    provider: Option<LlmProvider>,
) -> Result<GameConfig> {
    let mut config = if path.exists() {
        GameConfig::from_file(path)?
    } else {
        info!(path = %path.display(), "No config file, using defaults");
        GameConfig::default()
    };

    if let Some(players) = players {
        config = config.with_player_count(players);
    }
    if let Some(rounds) = rounds {
        config = config.with_discussion_rounds(rounds);
    }
    if seed.is_some() {
        config = config.with_seed(seed);
    }
    if let Some(provider) = provider {
        config = config.with_provider(provider);
    }
    Ok(config)
}

/// Runs one game to completion.
#[instrument(skip(config))]
async fn run_game(config: GameConfig, offline: bool, reveal: bool, max_steps: usize) -> Result<()> {
    let decider: Arc<dyn DecisionMaker> = if offline {
        let seed = config.seed().unwrap_or(0);
        Arc::new(ScriptedAgent::new(seed).with_think_time(Duration::from_millis(150)))
    } else {
        Arc::new(LlmAgent::from_config(&config)?)
    };

    let controller = GameController::new(decider, ControllerOptions::from(&config));
    controller.init_game()?;

    let viewer = if reveal {
        Viewer::Omniscient
    } else {
        Viewer::Public
    };

    let mut printed = 0;
    if reveal {
        print_roles(&controller.snapshot());
    }

    for _ in 0..max_steps {
        controller.advance().await;
        let state = controller.snapshot();
        let entries = state.logs_for(&viewer);
        for entry in entries.iter().skip(printed) {
            print_entry(&state, entry);
        }
        printed = entries.len();

        if let Some(winner) = state.winner() {
            println!("\n=== Game over: {} win on day {} ===", winner, state.day_count());
            print_roles(&state);
            return Ok(());
        }
    }

    warn!(max_steps, "Step limit reached before the game ended");
    println!("\n=== Stopped after {} steps ===", max_steps);
    Ok(())
}

fn print_entry(state: &GameState, entry: &LogEntry) {
    let speaker = match entry.speaker() {
        Speaker::GameMaster => "GM".to_string(),
        Speaker::Player(id) => state.name_of(id),
    };
    let marker = if entry.visibility().is_public() { "" } else { " (private)" };
    match entry.kind() {
        LogKind::Chat => println!("[Day {}] {}: {}", entry.day(), speaker, entry.content()),
        LogKind::Death => println!("[Day {}] *** {} ***", entry.day(), entry.content()),
        LogKind::System | LogKind::Action => {
            println!("[Day {}] <{}>{} {}", entry.day(), speaker, marker, entry.content())
        }
    }
}

fn print_roles(state: &GameState) {
    for player in state.players() {
        let status = if player.is_alive() { "alive" } else { "dead" };
        println!("  {:<10} {:<10} {}", player.name(), player.role().to_string(), status);
    }
}
