//! Shared constants used across the application

use std::time::Duration;

/// Endpoint used when neither the config file nor the command line names one.
pub const DEFAULT_ENDPOINT: &str = "https://ai-fund-bot.glitch.me/chat";

/// Sender label for messages typed (or spoken) by the user.
pub const USER_SENDER: &str = "You";

/// Sender label for everything the calculator says.
pub const BOT_SENDER: &str = "AI FundBot";

/// Shown when the service answers without a usable `reply`.
pub const FALLBACK_REPLY: &str = "Sorry, I could not calculate that.";

/// Shown for every kind of request failure.
pub const CALCULATION_FAILED: &str = "⚠️ Calculation failed. Please check your connection.";

/// Opening message from the bot.
pub const GREETING: &str = "👋 Hello! I'm here to help you calculate your emergency fund. Ask me anything like: \"How much emergency fund do I need if my salary is ₹50,000?\"";

/// Text of the typing indicator, before the animated dots.
pub const INDICATOR_TEXT: &str = "AI FundBot is calculating";

/// Minimum time the indicator stays up after a request starts.
pub const DEFAULT_REPLY_DELAY: Duration = Duration::from_millis(1000);

/// Period of the indicator's dot animation.
pub const DEFAULT_INDICATOR_INTERVAL: Duration = Duration::from_millis(400);

/// Delay between opening the chat and the greeting appearing.
pub const GREETING_DELAY: Duration = Duration::from_millis(300);

/// Language hint handed to the speech recognizer.
pub const DEFAULT_VOICE_LANGUAGE: &str = "en-US";

/// How long to wait for the calculation service to accept a connection.
pub const HTTP_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Upper bound on one calculation request, connect included. A turn that
/// hits it fails like any other transport error.
pub const HTTP_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
