use std::error::Error;
use std::sync::Arc;

use tracing::{info, warn};

use super::ChatOptions;
use crate::api::{FundClient, FundService};
use crate::core::app::{App, AppChannels, AppInit};
use crate::core::config::Config;
use crate::core::voice::{CommandRecognizer, SpeechRecognizer};
use crate::ui::appearance::detect_theme_mode;
use crate::ui::theme::ThemeMode;
use crate::utils::logging::LoggingState;
use crate::utils::url::validate_endpoint;

/// Build the application state for the chat loop from the saved config and
/// the command-line overrides for this run.
pub fn bootstrap_app(
    config: &Config,
    options: ChatOptions,
) -> Result<(App, AppChannels), Box<dyn Error>> {
    let endpoint = match options.endpoint {
        Some(endpoint) => endpoint,
        None => validate_endpoint(config.endpoint())?,
    };
    let service: Arc<dyn FundService> = Arc::new(FundClient::new(endpoint.clone())?);

    let recognizer = CommandRecognizer::from_argv(&config.voice_command, config.voice_language())
        .map(|recognizer| {
            info!(program = recognizer.program(), "voice input enabled");
            Arc::new(recognizer) as Arc<dyn SpeechRecognizer>
        });
    if recognizer.is_none() && !config.voice_command.is_empty() {
        warn!("voice_command is set but has no program; voice input disabled");
    }

    let theme_mode = resolve_theme_mode(options.theme, config.theme, detect_theme_mode);
    let logging = LoggingState::new(options.log)?;

    Ok(App::new(AppInit {
        service,
        recognizer,
        endpoint,
        theme_mode,
        clock: config.clock(),
        reply_delay: config.reply_delay(),
        logging,
    }))
}

/// Command line first, then config, then the desktop preference.
fn resolve_theme_mode(
    cli: Option<ThemeMode>,
    configured: Option<ThemeMode>,
    detect: impl FnOnce() -> Option<ThemeMode>,
) -> ThemeMode {
    cli.or(configured).or_else(detect).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn options() -> ChatOptions {
        ChatOptions {
            endpoint: None,
            theme: None,
            log: None,
        }
    }

    #[test]
    fn theme_precedence() {
        let never = || -> Option<ThemeMode> { panic!("detection should not run") };
        assert_eq!(
            resolve_theme_mode(Some(ThemeMode::Dark), Some(ThemeMode::Light), never),
            ThemeMode::Dark
        );
        assert_eq!(
            resolve_theme_mode(None, Some(ThemeMode::Dark), never),
            ThemeMode::Dark
        );
        assert_eq!(
            resolve_theme_mode(None, None, || Some(ThemeMode::Dark)),
            ThemeMode::Dark
        );
        assert_eq!(resolve_theme_mode(None, None, || None), ThemeMode::Light);
    }

    #[tokio::test]
    async fn config_drives_the_session() {
        let config = Config {
            endpoint: Some("http://localhost:9000/chat".to_string()),
            theme: Some(ThemeMode::Dark),
            voice_command: vec!["listen".to_string(), "--once".to_string()],
            ..Config::default()
        };
        let (app, _channels) = bootstrap_app(&config, options()).expect("bootstrap");
        assert_eq!(app.endpoint, "http://localhost:9000/chat");
        assert_eq!(app.theme_mode, ThemeMode::Dark);
        assert!(app.voice.is_available());
        assert!(!app.logging.is_active());
    }

    #[tokio::test]
    async fn command_line_overrides_config() {
        let dir = TempDir::new().expect("temp dir");
        let log = dir.path().join("chat.log");
        let config = Config {
            endpoint: Some("http://localhost:9000/chat".to_string()),
            theme: Some(ThemeMode::Dark),
            ..Config::default()
        };
        let (app, _channels) = bootstrap_app(
            &config,
            ChatOptions {
                endpoint: Some("https://other.test/chat".to_string()),
                theme: Some(ThemeMode::Light),
                log: Some(log.to_string_lossy().into_owned()),
            },
        )
        .expect("bootstrap");
        assert_eq!(app.endpoint, "https://other.test/chat");
        assert_eq!(app.theme_mode, ThemeMode::Light);
        assert!(!app.voice.is_available());
        assert_eq!(app.logging.get_status_string(), "chat.log");
    }

    #[test]
    fn invalid_configured_endpoint_is_rejected() {
        let config = Config {
            endpoint: Some("ftp://example.com".to_string()),
            ..Config::default()
        };
        assert!(bootstrap_app(&config, options()).is_err());
    }
}
