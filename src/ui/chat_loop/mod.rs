//! Main chat event loop.
//!
//! A single task owns the [`App`] and waits on terminal input, finished
//! turns, voice captures, the indicator animation tick and the greeting
//! timer. Every branch mutates the app and the next pass redraws it.

mod keybindings;
mod lifecycle;
mod setup;

use self::keybindings::{resolve_key, KeyAction};
use self::lifecycle::{restore_terminal, setup_terminal, ChatTerminal};
use self::setup::bootstrap_app;

use crate::core::app::{App, AppChannels};
use crate::core::config::Config;
use crate::core::constants::GREETING_DELAY;
use crate::core::voice::ActivateOutcome;
use crate::ui::renderer::{chat_max_offset, layout_chunks, ui};
use crate::ui::theme::ThemeMode;
use ratatui::crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use ratatui::layout::Rect;
use std::{error::Error, time::Duration};
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use tui_textarea::Input as TAInput;

/// Per-run overrides from the command line.
#[derive(Debug, Clone, Default)]
pub struct ChatOptions {
    pub endpoint: Option<String>,
    pub theme: Option<ThemeMode>,
    pub log: Option<String>,
}

#[derive(Debug)]
pub enum UiEvent {
    Crossterm(Event),
}

/// Read terminal events on a blocking thread until `cancel` fires or the
/// receiving side goes away.
fn spawn_event_reader(
    event_tx: mpsc::UnboundedSender<UiEvent>,
    cancel: CancellationToken,
) -> tokio::task::JoinHandle<()> {
    tokio::task::spawn_blocking(move || {
        while !cancel.is_cancelled() {
            match event::poll(Duration::from_millis(50)) {
                Ok(true) => match event::read() {
                    Ok(ev) => {
                        if event_tx.send(UiEvent::Crossterm(ev)).is_err() {
                            break;
                        }
                    }
                    Err(err) => warn!(error = %err, "failed to read terminal event"),
                },
                Ok(false) => {}
                Err(err) => {
                    warn!(error = %err, "terminal event polling failed");
                    break;
                }
            }
        }
    })
}

pub async fn run_chat(config: Config, options: ChatOptions) -> Result<(), Box<dyn Error>> {
    let (mut app, channels) = bootstrap_app(&config, options)?;
    info!(endpoint = %app.endpoint, theme = %app.theme_mode, "starting chat session");

    let mut terminal = setup_terminal()?;
    let result = event_loop(&mut terminal, &mut app, channels, config.indicator_interval()).await;
    restore_terminal(&mut terminal)?;

    info!(
        entries = app.conversation.transcript().len(),
        "chat session ended"
    );
    result
}

async fn event_loop(
    terminal: &mut ChatTerminal,
    app: &mut App,
    mut channels: AppChannels,
    indicator_interval: Duration,
) -> Result<(), Box<dyn Error>> {
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<UiEvent>();
    let cancel = CancellationToken::new();
    let reader = spawn_event_reader(event_tx, cancel.clone());

    let mut ticker = tokio::time::interval(indicator_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let greeting = tokio::time::sleep(GREETING_DELAY);
    tokio::pin!(greeting);
    let mut greeted = false;
    let mut request_redraw = true;

    let result = loop {
        if app.exit_requested {
            break Ok(());
        }
        if request_redraw {
            if let Err(err) = terminal.draw(|f| ui(f, app)) {
                break Err(err.into());
            }
            request_redraw = false;
        }
        let area = match terminal.size() {
            Ok(size) => Rect::new(0, 0, size.width, size.height),
            Err(err) => break Err(err.into()),
        };

        tokio::select! {
            event = event_rx.recv() => match event {
                Some(event) => request_redraw = handle_ui_event(app, event, area),
                None => break Ok(()),
            },
            Some(turn) = channels.turns.recv() => {
                debug!(turn = turn.turn_id, "turn finished");
                app.apply_turn_event(turn);
                request_redraw = true;
            }
            Some(voice) = channels.voice.recv() => {
                app.apply_voice_event(voice);
                request_redraw = true;
            }
            _ = ticker.tick() => request_redraw = app.tick(),
            _ = &mut greeting, if !greeted => {
                greeted = true;
                app.greet();
                request_redraw = true;
            }
        }
    };

    cancel.cancel();
    if let Err(err) = reader.await {
        warn!(error = %err, "terminal event reader did not shut down cleanly");
    }
    result
}

/// Apply one terminal event. Returns whether the screen needs a redraw.
fn handle_ui_event(app: &mut App, event: UiEvent, area: Rect) -> bool {
    match event {
        UiEvent::Crossterm(Event::Key(key)) if key.kind == KeyEventKind::Press => {
            handle_key(app, &key, area)
        }
        UiEvent::Crossterm(Event::Paste(text)) => {
            app.input.insert_str(text);
            true
        }
        UiEvent::Crossterm(Event::Resize(_, _)) => true,
        UiEvent::Crossterm(_) => false,
    }
}

fn handle_key(app: &mut App, key: &KeyEvent, area: Rect) -> bool {
    let page = layout_chunks(area)[0].height.saturating_sub(1).max(1);
    match resolve_key(key) {
        KeyAction::Quit => app.exit_requested = true,
        KeyAction::Submit => {
            app.submit_input();
        }
        KeyAction::ToggleTheme => app.toggle_theme(),
        KeyAction::ActivateMic => match app.activate_voice() {
            ActivateOutcome::Unavailable => return false,
            ActivateOutcome::AlreadyListening => debug!("microphone already listening"),
            ActivateOutcome::Listening => debug!("microphone listening"),
        },
        KeyAction::ScrollUp => app.scroll.scroll_up(1, chat_max_offset(app, area)),
        KeyAction::ScrollDown => app.scroll.scroll_down(1, chat_max_offset(app, area)),
        KeyAction::PageUp => app.scroll.scroll_up(page, chat_max_offset(app, area)),
        KeyAction::PageDown => app.scroll.scroll_down(page, chat_max_offset(app, area)),
        KeyAction::ScrollTop => app.scroll.scroll_to_top(chat_max_offset(app, area)),
        KeyAction::ScrollBottom => app.scroll.follow_bottom(),
        KeyAction::Edit => {
            return app.input.input(TAInput::from(*key));
        }
    }
    true
}
