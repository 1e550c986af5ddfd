//! Command-line interface for werewolf_gm.

use clap::{Parser, Subcommand};
use werewolf_gm::LlmProvider;

/// Werewolf game master - LLM agents play a game of werewolf
#[derive(Parser, Debug)]
#[command(name = "werewolf_gm")]
#[command(about = "Game master for werewolf played by LLM agents", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play one game to completion, printing the log as it grows
    Play {
        /// Path to game configuration file (defaults apply if missing)
        #[arg(short, long, default_value = "werewolf.toml")]
        config: std::path::PathBuf,

        /// Table size (5 or 7)
        #[arg(short, long)]
        players: Option<usize>,

        /// Discussion rounds per day
        #[arg(short, long)]
        rounds: Option<u32>,

        /// Seed for role shuffling and scripted agents
        #[arg(long)]
        seed: Option<u64>,

        /// LLM provider (openai, anthropic, gemini)
        #[arg(long)]
        provider: Option<LlmProvider>,

        /// Play with scripted agents instead of an LLM
        #[arg(long)]
        offline: bool,

        /// Print every log entry, including private ones, and reveal roles
        #[arg(long)]
        reveal: bool,

        /// Safety cap on advance calls
        #[arg(long, default_value = "500")]
        max_steps: usize,
    },
}
