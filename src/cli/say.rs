//! TUI-less "say" command

use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use crate::api::{FundClient, FundService};
use crate::core::config::Config;
use crate::core::conversation::{ConversationController, ConversationSettings, TurnResolution};
use crate::utils::url::validate_endpoint;

pub async fn run_say(
    config: &Config,
    prompt: Vec<String>,
    endpoint: Option<String>,
) -> Result<(), Box<dyn Error>> {
    let prompt = prompt.join(" ");
    if prompt.trim().is_empty() {
        eprintln!("Usage: fundbot say <question>");
        std::process::exit(1);
    }

    let endpoint = match endpoint {
        Some(endpoint) => endpoint,
        None => validate_endpoint(config.endpoint())?,
    };
    let service: Arc<dyn FundService> = Arc::new(FundClient::new(endpoint)?);

    match ask(service, &prompt).await {
        Some(TurnResolution {
            message,
            failed: false,
        }) => {
            println!("{}", message.text);
            Ok(())
        }
        Some(TurnResolution {
            message,
            failed: true,
        }) => {
            eprintln!("{}", message.text);
            std::process::exit(1);
        }
        None => {
            eprintln!("❌ No answer was received");
            std::process::exit(1);
        }
    }
}

/// Run one turn with no pacing delay.
async fn ask(service: Arc<dyn FundService>, prompt: &str) -> Option<TurnResolution> {
    let (mut controller, mut rx) = ConversationController::new(
        service,
        ConversationSettings {
            reply_delay: Duration::ZERO,
        },
    );
    controller.run_turn(&mut rx, prompt).await
}
