//! Explicit UI state for an interactive session.
//!
//! Everything the chat screen shows lives here and is drawn by the pure
//! render functions in [`crate::ui::renderer`]. The event loop owns the one
//! `App` and is the only code that mutates it.

use std::sync::Arc;
use std::time::Duration;

use ratatui::style::Style;
use ratatui::widgets::{Block, Borders};
use tokio::sync::mpsc;
use tracing::warn;
use tui_textarea::{CursorMove, TextArea};

use crate::api::FundService;
use crate::core::conversation::{
    ConversationController, ConversationSettings, SubmitOutcome, TurnEvent,
};
use crate::core::message::ClockFormat;
use crate::core::voice::{ActivateOutcome, SpeechRecognizer, VoiceEvent, VoiceInput};
use crate::ui::theme::{Theme, ThemeMode};
use crate::utils::logging::LoggingState;
use crate::utils::scroll::ScrollState;

const INPUT_PLACEHOLDER: &str = "Ask about your emergency fund…";
const BUSY_STATUS: &str = "Still calculating the last answer, hang on…";

pub struct AppInit {
    pub service: Arc<dyn FundService>,
    pub recognizer: Option<Arc<dyn SpeechRecognizer>>,
    pub endpoint: String,
    pub theme_mode: ThemeMode,
    pub clock: ClockFormat,
    pub reply_delay: Duration,
    pub logging: LoggingState,
}

/// Receivers the event loop listens on for background results.
pub struct AppChannels {
    pub turns: mpsc::UnboundedReceiver<TurnEvent>,
    pub voice: mpsc::UnboundedReceiver<VoiceEvent>,
}

pub struct App {
    pub conversation: ConversationController,
    pub voice: VoiceInput,
    pub theme_mode: ThemeMode,
    pub theme: Theme,
    pub clock: ClockFormat,
    pub input: TextArea<'static>,
    pub scroll: ScrollState,
    pub status: Option<String>,
    pub logging: LoggingState,
    pub endpoint: String,
    pub exit_requested: bool,
    logged_entries: usize,
}

impl App {
    pub fn new(init: AppInit) -> (Self, AppChannels) {
        let (conversation, turns) = ConversationController::new(
            init.service,
            ConversationSettings {
                reply_delay: init.reply_delay,
            },
        );
        let (voice, voice_rx) = VoiceInput::new(init.recognizer);
        let theme = Theme::for_mode(init.theme_mode);
        let input = new_input(&theme, "");

        let app = App {
            conversation,
            voice,
            theme_mode: init.theme_mode,
            theme,
            clock: init.clock,
            input,
            scroll: ScrollState::default(),
            status: None,
            logging: init.logging,
            endpoint: init.endpoint,
            exit_requested: false,
            logged_entries: 0,
        };
        let channels = AppChannels {
            turns,
            voice: voice_rx,
        };
        (app, channels)
    }

    pub fn input_text(&self) -> String {
        self.input.lines().join("\n")
    }

    pub fn set_input_text(&mut self, text: &str) {
        self.input = new_input(&self.theme, text);
    }

    /// Submit whatever is in the input box. The box is cleared only when a
    /// turn actually starts.
    pub fn submit_input(&mut self) -> SubmitOutcome {
        let outcome = self.conversation.submit(&self.input_text());
        match outcome {
            SubmitOutcome::Started(_) => {
                self.set_input_text("");
                self.status = None;
            }
            SubmitOutcome::Busy => self.status = Some(BUSY_STATUS.to_string()),
            SubmitOutcome::Empty => {}
        }
        self.sync_transcript();
        outcome
    }

    pub fn apply_turn_event(&mut self, event: TurnEvent) {
        if self.conversation.finish(event).is_some() && self.status.as_deref() == Some(BUSY_STATUS)
        {
            self.status = None;
        }
        self.sync_transcript();
    }

    pub fn activate_voice(&mut self) -> ActivateOutcome {
        self.voice.activate()
    }

    /// A transcription goes through the same path as typed text: it lands in
    /// the input box and is submitted from there. While a turn is pending the
    /// typed draft is left untouched and the transcription is dropped.
    pub fn apply_voice_event(&mut self, event: VoiceEvent) -> Option<SubmitOutcome> {
        let text = self.voice.finish(event)?;
        if self.conversation.is_pending() {
            self.status = Some(BUSY_STATUS.to_string());
            return Some(SubmitOutcome::Busy);
        }
        self.set_input_text(&text);
        Some(self.submit_input())
    }

    pub fn toggle_theme(&mut self) {
        self.theme_mode.toggle();
        self.theme = Theme::for_mode(self.theme_mode);
        apply_input_theme(&mut self.input, &self.theme);
    }

    pub fn greet(&mut self) {
        self.conversation.greet();
        self.sync_transcript();
    }

    /// Advance the typing indicator animation. Returns whether a redraw is needed.
    pub fn tick(&mut self) -> bool {
        self.conversation.tick_indicator()
    }

    /// Export new transcript entries and bring the newest one into view.
    fn sync_transcript(&mut self) {
        let entries = self.conversation.transcript().entries();
        if entries.len() == self.logged_entries {
            return;
        }
        for message in &entries[self.logged_entries..] {
            if let Err(err) = self.logging.log_message(message, self.clock) {
                warn!(error = %err, "failed to write transcript log");
                self.status = Some(format!("Transcript log failed: {err}"));
            }
        }
        self.logged_entries = entries.len();
        self.scroll.follow_bottom();
    }
}

fn new_input(theme: &Theme, text: &str) -> TextArea<'static> {
    let mut textarea = if text.is_empty() {
        TextArea::default()
    } else {
        TextArea::new(text.lines().map(str::to_string).collect())
    };
    apply_input_theme(&mut textarea, theme);
    textarea.move_cursor(CursorMove::Bottom);
    textarea.move_cursor(CursorMove::End);
    textarea
}

fn apply_input_theme(textarea: &mut TextArea<'static>, theme: &Theme) {
    textarea.set_style(theme.input_text_style.bg(theme.background_color));
    textarea.set_cursor_line_style(Style::default());
    textarea.set_placeholder_text(INPUT_PLACEHOLDER);
    textarea.set_placeholder_style(theme.status_style);
    textarea.set_block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(theme.input_border_style)
            .title(" Message "),
    );
}
