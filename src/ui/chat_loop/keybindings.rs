//! Mapping from terminal key events to chat actions.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Quit,
    Submit,
    ToggleTheme,
    ActivateMic,
    ScrollUp,
    ScrollDown,
    PageUp,
    PageDown,
    ScrollTop,
    ScrollBottom,
    /// Anything else is handed to the input box.
    Edit,
}

pub fn resolve_key(key: &KeyEvent) -> KeyAction {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Esc => KeyAction::Quit,
        KeyCode::Char('c') if ctrl => KeyAction::Quit,
        KeyCode::Char('t') if ctrl => KeyAction::ToggleTheme,
        KeyCode::Enter => KeyAction::Submit,
        KeyCode::F(2) => KeyAction::ActivateMic,
        KeyCode::Up => KeyAction::ScrollUp,
        KeyCode::Down => KeyAction::ScrollDown,
        KeyCode::PageUp => KeyAction::PageUp,
        KeyCode::PageDown => KeyAction::PageDown,
        KeyCode::Home => KeyAction::ScrollTop,
        KeyCode::End => KeyAction::ScrollBottom,
        _ => KeyAction::Edit,
    }
}
