use std::fmt;
use std::str::FromStr;

use chrono::{Local, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::core::constants::{BOT_SENDER, USER_SENDER};

/// One entry in the transcript. Never mutated after it is appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub sender: String,
    pub text: String,
    pub is_from_bot: bool,
    pub timestamp: NaiveTime,
}

impl Message {
    /// Create a message stamped with the current local time.
    pub fn new(sender: impl Into<String>, text: impl Into<String>, is_from_bot: bool) -> Self {
        Self::at(sender, text, is_from_bot, Local::now().time())
    }

    pub fn at(
        sender: impl Into<String>,
        text: impl Into<String>,
        is_from_bot: bool,
        timestamp: NaiveTime,
    ) -> Self {
        Self {
            sender: sender.into(),
            text: text.into(),
            is_from_bot,
            // Only hour and minute are ever shown.
            timestamp: timestamp.with_nanosecond(0).unwrap_or(timestamp),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(USER_SENDER, text, false)
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self::new(BOT_SENDER, text, true)
    }

    pub fn formatted_time(&self, clock: ClockFormat) -> String {
        clock.format(self.timestamp)
    }
}

/// How message timestamps are written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClockFormat {
    #[default]
    #[serde(rename = "24h")]
    TwentyFourHour,
    #[serde(rename = "12h")]
    TwelveHour,
}

impl ClockFormat {
    pub fn format(self, time: NaiveTime) -> String {
        match self {
            ClockFormat::TwentyFourHour => time.format("%H:%M").to_string(),
            ClockFormat::TwelveHour => time.format("%I:%M %p").to_string(),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ClockFormat::TwentyFourHour => "24h",
            ClockFormat::TwelveHour => "12h",
        }
    }
}

impl fmt::Display for ClockFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClockFormat {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "24h" | "24" => Ok(ClockFormat::TwentyFourHour),
            "12h" | "12" => Ok(ClockFormat::TwelveHour),
            other => Err(format!("invalid clock format: {other} (expected 24h or 12h)")),
        }
    }
}
