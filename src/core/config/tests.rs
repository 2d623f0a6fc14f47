use super::data::Config;
use super::io::ConfigError;
use crate::core::constants::DEFAULT_ENDPOINT;
use crate::core::message::ClockFormat;
use crate::ui::theme::ThemeMode;
use std::time::Duration;
use tempfile::TempDir;

#[test]
fn test_load_nonexistent_config() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("nonexistent_config.toml");

    let config = Config::load_from_path(&config_path).expect("Failed to load config");

    assert_eq!(config, Config::default());
    assert_eq!(config.endpoint(), DEFAULT_ENDPOINT);
    assert_eq!(config.reply_delay(), Duration::from_millis(1000));
    assert_eq!(config.indicator_interval(), Duration::from_millis(400));
    assert_eq!(config.clock(), ClockFormat::TwentyFourHour);
    assert_eq!(config.voice_language(), "en-US");
}

#[test]
fn test_config_persistence_lifecycle() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("nested").join("config.toml");

    let config = Config {
        endpoint: Some("http://localhost:8080/chat".to_string()),
        theme: Some(ThemeMode::Dark),
        clock: Some(ClockFormat::TwelveHour),
        voice_command: vec!["whisper".to_string(), "--mic".to_string()],
        ..Default::default()
    };
    config.save_to_path(&config_path).expect("save failed");

    let loaded = Config::load_from_path(&config_path).expect("load failed");
    assert_eq!(loaded, config);

    let mut updated = loaded;
    updated.theme = None;
    updated.voice_command.clear();
    updated.save_to_path(&config_path).expect("second save failed");

    let reloaded = Config::load_from_path(&config_path).expect("reload failed");
    assert_eq!(reloaded.theme, None);
    assert!(reloaded.voice_command.is_empty());
    assert_eq!(reloaded.endpoint(), "http://localhost:8080/chat");
}

#[test]
fn test_parses_hand_written_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("config.toml");
    std::fs::write(
        &config_path,
        r#"
endpoint = "https://fund.example/chat"
theme = "light"
clock = "12h"
reply_delay_ms = 250
indicator_interval_ms = 0
voice_command = ["sh", "-c", "listen --once"]
voice_language = "hi-IN"
"#,
    )
    .expect("write config");

    let config = Config::load_from_path(&config_path).expect("load failed");
    assert_eq!(config.theme, Some(ThemeMode::Light));
    assert_eq!(config.clock(), ClockFormat::TwelveHour);
    assert_eq!(config.reply_delay(), Duration::from_millis(250));
    // Zero would spin the animation timer; the default applies instead.
    assert_eq!(config.indicator_interval(), Duration::from_millis(400));
    assert_eq!(config.voice_command.len(), 3);
    assert_eq!(config.voice_language(), "hi-IN");
}

#[test]
fn test_invalid_toml_reports_path() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("config.toml");
    std::fs::write(&config_path, "theme = \"sepia\"\n").expect("write config");

    let err = Config::load_from_path(&config_path).expect_err("sepia is not a theme");
    let config_err = err
        .downcast_ref::<ConfigError>()
        .expect("should be a ConfigError");
    assert!(matches!(config_err, ConfigError::Parse { .. }));
    assert!(err.to_string().contains("Failed to parse config"));
}
