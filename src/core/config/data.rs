use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::core::message::ClockFormat;
use crate::ui::theme::ThemeMode;

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
pub struct Config {
    /// URL the fund questions are posted to
    pub endpoint: Option<String>,
    /// Theme to start in; the OS preference is used when unset
    pub theme: Option<ThemeMode>,
    /// Timestamp style for transcript entries ("24h" or "12h")
    pub clock: Option<ClockFormat>,
    /// Minimum time, in milliseconds, the typing indicator stays up
    pub reply_delay_ms: Option<u64>,
    /// Period, in milliseconds, of the typing indicator animation
    pub indicator_interval_ms: Option<u64>,
    /// Program (and arguments) that records one utterance and prints its text.
    /// Voice input is disabled when empty.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub voice_command: Vec<String>,
    /// Language hint passed to the voice command (e.g., "en-US")
    pub voice_language: Option<String>,
}

/// Get a user-friendly display string for a path
/// Converts absolute paths to use ~ notation on Unix-like systems when possible
pub fn path_display<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();

    #[cfg(unix)]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let home_path = PathBuf::from(home);
            if let Ok(relative) = path.strip_prefix(&home_path) {
                return format!("~/{}", relative.display());
            }
        }
    }

    path.display().to_string()
}
