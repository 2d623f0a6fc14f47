//! Command-line interface parsing and handling
//!
//! This module parses command-line arguments, sets up diagnostics and
//! dispatches to the chat UI, the one-shot `say` command or config editing.

pub mod say;
pub mod settings;

use std::error::Error;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::cli::say::run_say;
use crate::cli::settings::{apply_set, apply_unset, SettingError};
use crate::core::config::Config;
use crate::ui::chat_loop::{run_chat, ChatOptions};
use crate::ui::theme::ThemeMode;
use crate::utils::url::validate_endpoint;

const DEFAULT_LOG_FILTER: &str = "fundbot=info";

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("VERGEN_GIT_DESCRIBE"),
    ", built ",
    env!("VERGEN_BUILD_TIMESTAMP"),
    ")"
);

#[derive(Parser)]
#[command(name = "fundbot")]
#[command(version, long_version = LONG_VERSION)]
#[command(about = "Chat with an emergency fund calculator from your terminal")]
#[command(
    long_about = "fundbot is a full-screen terminal chat with the AI FundBot emergency fund \
calculator. Ask how large your emergency fund should be and the bot answers from the \
calculation service.\n\n\
Controls:\n\
  Enter             Send the message\n\
  Ctrl+T            Switch between light and dark theme\n\
  F2                Speak a question (needs voice-command in the config)\n\
  Up/Down           Scroll one line\n\
  PgUp/PgDn         Scroll one page\n\
  Home/End          Jump to the first or newest message\n\
  Esc or Ctrl+C     Quit"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Calculation service URL for this run (overrides the config)
    #[arg(short = 'e', long, global = true, value_parser = parse_endpoint)]
    pub endpoint: Option<String>,

    /// Start in the given theme (light or dark)
    #[arg(short = 't', long, global = true)]
    pub theme: Option<ThemeMode>,

    /// Append the transcript to the given file
    #[arg(short = 'l', long, global = true)]
    pub log: Option<String>,

    /// Write diagnostics to the given file (filter with RUST_LOG)
    #[arg(long, global = true, value_name = "FILE")]
    pub debug_log: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the chat interface (default)
    Chat,
    /// Ask a single question without the chat interface and print the answer
    Say {
        /// The question to ask
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        prompt: Vec<String>,
    },
    /// Set configuration values, or print the current configuration
    Set {
        /// Configuration key to set
        key: Option<String>,
        /// Value to set for the key
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        value: Vec<String>,
    },
    /// Unset configuration values
    Unset {
        /// Configuration key to unset
        key: String,
    },
}

fn parse_endpoint(raw: &str) -> Result<String, String> {
    validate_endpoint(raw).map_err(|err| err.to_string())
}

pub fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let interactive = matches!(args.command, None | Some(Commands::Chat));
    init_tracing(args.debug_log.as_deref(), interactive)?;

    tokio::runtime::Runtime::new()?.block_on(async_main(args))
}

/// Install the tracing subscriber. While the chat UI owns the terminal,
/// diagnostics only go to a file.
fn init_tracing(debug_log: Option<&Path>, interactive: bool) -> Result<(), Box<dyn Error>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    match debug_log {
        Some(path) => {
            let file = File::create(path)?;
            tracing_subscriber::fmt()
                .with_writer(Mutex::new(file))
                .with_env_filter(filter)
                .with_ansi(false)
                .try_init()
                .map_err(|err| -> Box<dyn Error> { err })?;
        }
        None if !interactive => {
            tracing_subscriber::fmt()
                .with_writer(std::io::stderr)
                .with_env_filter(filter)
                .try_init()
                .map_err(|err| -> Box<dyn Error> { err })?;
        }
        None => {}
    }
    Ok(())
}

async fn async_main(args: Args) -> Result<(), Box<dyn Error>> {
    match args.command.unwrap_or(Commands::Chat) {
        Commands::Chat => {
            let config = Config::load()?;
            run_chat(
                config,
                ChatOptions {
                    endpoint: args.endpoint,
                    theme: args.theme,
                    log: args.log,
                },
            )
            .await
        }
        Commands::Say { prompt } => {
            let config = Config::load()?;
            run_say(&config, prompt, args.endpoint).await
        }
        Commands::Set { key, value } => {
            let mut config = Config::load()?;
            match set_config(&mut config, key.as_deref(), &value) {
                Some(Ok(message)) => {
                    config.save()?;
                    println!("{message}");
                }
                Some(Err(err)) => {
                    err.print();
                    std::process::exit(1);
                }
                None => config.print_all(),
            }
            Ok(())
        }
        Commands::Unset { key } => {
            let mut config = Config::load()?;
            match apply_unset(&mut config, &key) {
                Ok(message) => {
                    config.save()?;
                    println!("{message}");
                }
                Err(err) => {
                    err.print();
                    std::process::exit(1);
                }
            }
            Ok(())
        }
    }
}

/// `fundbot set` without a key prints the config (`None`); with a key it
/// always goes through [`apply_set`] so a missing value shows its hint.
fn set_config(
    config: &mut Config,
    key: Option<&str>,
    value: &[String],
) -> Option<Result<String, SettingError>> {
    key.map(|key| apply_set(config, key, value))
}
