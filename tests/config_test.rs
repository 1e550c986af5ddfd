//! Loading game configuration from TOML.

use std::io::Write;
use werewolf_gm::{ControllerOptions, GameConfig, LlmProvider, RetryPolicy};

#[test]
fn test_empty_file_uses_defaults() {
    let config = GameConfig::from_toml("").expect("parse");
    assert_eq!(config, GameConfig::default());
    assert_eq!(*config.player_count(), 5);
    assert_eq!(*config.discussion_rounds(), 3);
    assert_eq!(*config.llm_provider(), LlmProvider::Gemini);
    assert_eq!(*config.history_window(), 50);
    assert_eq!(config.retry(), &RetryPolicy::default());
}

#[test]
fn test_load_from_file() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(
        file,
        r#"
player_count = 7
discussion_rounds = 2
llm_provider = "anthropic"
llm_model = "claude-3-5-haiku-20241022"
seed = 42

[retry]
max_attempts = 5
"#
    )
    .expect("write");

    let config = GameConfig::from_file(file.path()).expect("load");
    assert_eq!(*config.player_count(), 7);
    assert_eq!(*config.llm_provider(), LlmProvider::Anthropic);
    assert_eq!(config.llm_model(), "claude-3-5-haiku-20241022");
    assert_eq!(*config.seed(), Some(42));
    assert_eq!(config.retry().max_attempts, 5);
    assert_eq!(config.retry().initial_delay_ms, 1000);

    let options = ControllerOptions::from(&config);
    assert_eq!(options.player_count, 7);
    assert_eq!(options.discussion_rounds, 2);
    assert_eq!(options.seed, Some(42));
}

#[test]
fn test_sample_config_parses() {
    let config = GameConfig::from_file(concat!(env!("CARGO_MANIFEST_DIR"), "/config/werewolf.toml"))
        .expect("sample config");
    assert_eq!(*config.player_count(), 5);
}

#[test]
fn test_bad_config_is_an_error() {
    assert!(GameConfig::from_toml("player_count = \"five\"").is_err());
    assert!(GameConfig::from_toml("llm_provider = \"mistral\"").is_err());
    assert!(GameConfig::from_file("/nonexistent/werewolf.toml").is_err());
}

#[test]
fn test_overrides() {
    let config = GameConfig::default()
        .with_player_count(7)
        .with_discussion_rounds(1)
        .with_provider(LlmProvider::OpenAI)
        .with_seed(Some(9))
        .with_retry(RetryPolicy::immediate(1));
    assert_eq!(*config.player_count(), 7);
    assert_eq!(*config.discussion_rounds(), 1);
    assert_eq!(*config.llm_provider(), LlmProvider::OpenAI);
    assert_eq!(*config.seed(), Some(9));
    assert_eq!(config.retry().max_attempts, 1);
}
