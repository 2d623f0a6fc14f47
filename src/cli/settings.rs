//! `fundbot set` / `fundbot unset` key handling.
//!
//! These functions only mutate a [`Config`] in memory; the caller loads and
//! saves it.

use std::fmt;

use crate::core::config::Config;
use crate::core::message::ClockFormat;
use crate::ui::theme::ThemeMode;
use crate::utils::url::validate_endpoint;

pub const KEYS: &[&str] = &[
    "endpoint",
    "theme",
    "clock",
    "reply-delay-ms",
    "indicator-interval-ms",
    "voice-command",
    "voice-language",
];

/// Errors that can occur when modifying configuration settings.
#[derive(Debug)]
pub enum SettingError {
    UnknownKey(String),
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
    MissingArgs {
        hint: &'static str,
        example: &'static str,
    },
}

impl SettingError {
    /// Print the error message to stderr with appropriate formatting.
    pub fn print(&self) {
        match self {
            SettingError::UnknownKey(key) => {
                eprintln!("❌ Unknown config key: {key}");
                eprintln!("   Known keys: {}", KEYS.join(", "));
            }
            SettingError::InvalidValue { key, value, reason } => {
                eprintln!("❌ Invalid value for {key}: {value}");
                eprintln!("   {reason}");
            }
            SettingError::MissingArgs { hint, example } => {
                eprintln!("⚠️  {hint}");
                eprintln!("Example: {example}");
            }
        }
    }
}

impl fmt::Display for SettingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingError::UnknownKey(key) => write!(f, "Unknown config key: {key}"),
            SettingError::InvalidValue { key, value, reason } => {
                write!(f, "Invalid value for {key}: {value} ({reason})")
            }
            SettingError::MissingArgs { hint, .. } => write!(f, "{hint}"),
        }
    }
}

impl std::error::Error for SettingError {}

/// Apply `fundbot set <key> <args...>`. Returns the confirmation line.
pub fn apply_set(config: &mut Config, key: &str, args: &[String]) -> Result<String, SettingError> {
    let joined = args.join(" ");
    let value = joined.trim();

    match key {
        "endpoint" => {
            let value = require(
                value,
                "To set the endpoint, give a URL:",
                "fundbot set endpoint https://example.com/chat",
            )?;
            let endpoint =
                validate_endpoint(value).map_err(|err| invalid("endpoint", value, err))?;
            config.endpoint = Some(endpoint.clone());
            Ok(success_set("endpoint", &endpoint))
        }
        "theme" => {
            let value = require(
                value,
                "To set the theme, choose light or dark:",
                "fundbot set theme dark",
            )?;
            let mode: ThemeMode = value.parse().map_err(|err| invalid("theme", value, err))?;
            config.theme = Some(mode);
            Ok(success_set("theme", mode.as_str()))
        }
        "clock" => {
            let value = require(
                value,
                "To set the clock format, choose 24h or 12h:",
                "fundbot set clock 12h",
            )?;
            let clock: ClockFormat = value.parse().map_err(|err| invalid("clock", value, err))?;
            config.clock = Some(clock);
            Ok(success_set("clock", clock.as_str()))
        }
        "reply-delay-ms" => {
            let value = require(
                value,
                "To set the reply delay, give milliseconds:",
                "fundbot set reply-delay-ms 500",
            )?;
            let ms = parse_millis("reply-delay-ms", value)?;
            config.reply_delay_ms = Some(ms);
            Ok(success_set("reply-delay-ms", &ms.to_string()))
        }
        "indicator-interval-ms" => {
            let value = require(
                value,
                "To set the indicator interval, give milliseconds:",
                "fundbot set indicator-interval-ms 400",
            )?;
            let ms = parse_millis("indicator-interval-ms", value)?;
            if ms == 0 {
                return Err(invalid(
                    "indicator-interval-ms",
                    value,
                    "must be greater than zero",
                ));
            }
            config.indicator_interval_ms = Some(ms);
            Ok(success_set("indicator-interval-ms", &ms.to_string()))
        }
        "voice-command" => {
            let argv: Vec<String> = args
                .iter()
                .flat_map(|arg| arg.split_whitespace())
                .map(str::to_string)
                .collect();
            if argv.is_empty() {
                return Err(SettingError::MissingArgs {
                    hint: "To enable voice input, give the command that records one utterance:",
                    example: "fundbot set voice-command whisper-listen --once",
                });
            }
            let display = argv.join(" ");
            config.voice_command = argv;
            Ok(success_set("voice-command", &display))
        }
        "voice-language" => {
            let value = require(
                value,
                "To set the recognition language, give a language tag:",
                "fundbot set voice-language en-IN",
            )?;
            config.voice_language = Some(value.to_string());
            Ok(success_set("voice-language", value))
        }
        _ => Err(SettingError::UnknownKey(key.to_string())),
    }
}

/// Apply `fundbot unset <key>`. Returns the confirmation line.
pub fn apply_unset(config: &mut Config, key: &str) -> Result<String, SettingError> {
    match key {
        "endpoint" => config.endpoint = None,
        "theme" => config.theme = None,
        "clock" => config.clock = None,
        "reply-delay-ms" => config.reply_delay_ms = None,
        "indicator-interval-ms" => config.indicator_interval_ms = None,
        "voice-command" => config.voice_command.clear(),
        "voice-language" => config.voice_language = None,
        _ => return Err(SettingError::UnknownKey(key.to_string())),
    }
    Ok(format!("✅ Unset {key}"))
}

fn require<'a>(
    value: &'a str,
    hint: &'static str,
    example: &'static str,
) -> Result<&'a str, SettingError> {
    if value.is_empty() {
        Err(SettingError::MissingArgs { hint, example })
    } else {
        Ok(value)
    }
}

fn parse_millis(key: &'static str, value: &str) -> Result<u64, SettingError> {
    value.parse().map_err(|err| invalid(key, value, err))
}

fn invalid(key: &'static str, value: &str, reason: impl fmt::Display) -> SettingError {
    SettingError::InvalidValue {
        key,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn success_set(key: &str, value: &str) -> String {
    format!("✅ Set {key} to: {value}")
}
