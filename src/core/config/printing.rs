use crate::core::config::data::Config;

impl Config {
    pub fn print_all(&self) {
        println!("Current configuration:");
        match &self.endpoint {
            Some(endpoint) => println!("  endpoint: {endpoint}"),
            None => println!("  endpoint: {} (default)", self.endpoint()),
        }
        match &self.theme {
            Some(theme) => println!("  theme: {theme}"),
            None => println!("  theme: (follow system)"),
        }
        println!("  clock: {}", self.clock());
        println!("  reply-delay-ms: {}", self.reply_delay().as_millis());
        println!(
            "  indicator-interval-ms: {}",
            self.indicator_interval().as_millis()
        );
        if self.voice_command.is_empty() {
            println!("  voice-command: (unset, voice input disabled)");
        } else {
            println!("  voice-command: {}", self.voice_command.join(" "));
        }
        println!("  voice-language: {}", self.voice_language());
    }
}
