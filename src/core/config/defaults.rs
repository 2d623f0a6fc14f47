use std::time::Duration;

use crate::core::config::data::Config;
use crate::core::constants::{
    DEFAULT_ENDPOINT, DEFAULT_INDICATOR_INTERVAL, DEFAULT_REPLY_DELAY, DEFAULT_VOICE_LANGUAGE,
};
use crate::core::message::ClockFormat;

impl Config {
    pub fn endpoint(&self) -> &str {
        self.endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT)
    }

    pub fn clock(&self) -> ClockFormat {
        self.clock.unwrap_or_default()
    }

    pub fn reply_delay(&self) -> Duration {
        self.reply_delay_ms
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_REPLY_DELAY)
    }

    /// Never zero: a zero period would spin the event loop.
    pub fn indicator_interval(&self) -> Duration {
        self.indicator_interval_ms
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_INDICATOR_INTERVAL)
    }

    pub fn voice_language(&self) -> &str {
        self.voice_language
            .as_deref()
            .filter(|lang| !lang.trim().is_empty())
            .unwrap_or(DEFAULT_VOICE_LANGUAGE)
    }
}
