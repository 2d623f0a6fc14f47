use std::fmt;
use std::str::FromStr;

use ratatui::style::{Color, Modifier, Style};
use serde::{Deserialize, Serialize};

use crate::ui::builtin_themes::{find_builtin_theme, ThemeSpec};

/// Light or dark. Lives only in the running session; the config file only
/// chooses the starting value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    pub fn toggle(&mut self) {
        *self = match self {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        };
    }

    /// Glyph for the toggle control: it shows the mode you would switch to.
    pub fn glyph(self) -> &'static str {
        match self {
            ThemeMode::Light => "🌙",
            ThemeMode::Dark => "☀️",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
        }
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemeMode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(ThemeMode::Light),
            "dark" => Ok(ThemeMode::Dark),
            other => Err(format!("invalid theme: {other} (expected light or dark)")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Theme {
    pub background_color: Color,

    // Transcript
    pub user_prefix_style: Style,
    pub user_text_style: Style,
    pub bot_prefix_style: Style,
    pub bot_text_style: Style,
    pub timestamp_style: Style,
    pub indicator_style: Style,

    // Chrome
    pub title_style: Style,
    pub input_border_style: Style,
    pub input_text_style: Style,
    pub status_style: Style,
}

impl Theme {
    pub fn for_mode(mode: ThemeMode) -> Self {
        find_builtin_theme(mode.as_str())
            .map(|spec| Self::from_spec(&spec))
            .unwrap_or_else(|| Self::fallback(mode))
    }

    /// Terminal-palette version used if the built-in table lacks the mode.
    fn fallback(mode: ThemeMode) -> Self {
        let (background, text, accent, dim) = match mode {
            ThemeMode::Light => (Color::White, Color::Black, Color::Blue, Color::DarkGray),
            ThemeMode::Dark => (Color::Black, Color::White, Color::Cyan, Color::Gray),
        };
        Theme {
            background_color: background,
            user_prefix_style: Style::default().fg(accent).add_modifier(Modifier::BOLD),
            user_text_style: Style::default().fg(accent),
            bot_prefix_style: Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            bot_text_style: Style::default().fg(text),
            timestamp_style: Style::default().fg(dim),
            indicator_style: Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::ITALIC),
            title_style: Style::default().fg(dim),
            input_border_style: Style::default().fg(dim),
            input_text_style: Style::default().fg(text),
            status_style: Style::default().fg(dim),
        }
    }

    pub fn from_spec(spec: &ThemeSpec) -> Self {
        Theme {
            background_color: spec
                .background
                .as_deref()
                .and_then(parse_color)
                .unwrap_or(Color::Reset),
            user_prefix_style: parse_style(spec.user_prefix.as_deref()),
            user_text_style: parse_style(spec.user_text.as_deref()),
            bot_prefix_style: parse_style(spec.bot_prefix.as_deref()),
            bot_text_style: parse_style(spec.bot_text.as_deref()),
            timestamp_style: parse_style(spec.timestamp.as_deref()),
            indicator_style: parse_style(spec.indicator.as_deref()),
            title_style: parse_style(spec.title.as_deref()),
            input_border_style: parse_style(spec.input_border.as_deref()),
            input_text_style: parse_style(spec.input_text.as_deref()),
            status_style: parse_style(spec.status.as_deref()),
        }
    }
}

fn parse_style(spec: Option<&str>) -> Style {
    let mut style = Style::default();
    let Some(spec) = spec else {
        return style;
    };
    for token in spec.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        if let Some(color) = parse_color(token) {
            style = style.fg(color);
            continue;
        }
        match token.to_ascii_lowercase().as_str() {
            "bold" => style = style.add_modifier(Modifier::BOLD),
            "italic" => style = style.add_modifier(Modifier::ITALIC),
            "reversed" => style = style.add_modifier(Modifier::REVERSED),
            _ => {}
        }
    }
    style
}

fn parse_color(value: &str) -> Option<Color> {
    let lower = value.trim().to_ascii_lowercase();
    if let Some(hex) = lower.strip_prefix('#') {
        return parse_hex(hex);
    }
    if let Some(inner) = lower
        .strip_prefix("rgb(")
        .and_then(|rest| rest.strip_suffix(')'))
    {
        return parse_rgb_components(inner);
    }
    match lower.as_str() {
        "black" => Some(Color::Black),
        "white" => Some(Color::White),
        "gray" | "grey" => Some(Color::Gray),
        "dark_gray" | "dark-gray" | "darkgray" => Some(Color::DarkGray),
        "red" => Some(Color::Red),
        "green" => Some(Color::Green),
        "blue" => Some(Color::Blue),
        "cyan" => Some(Color::Cyan),
        "magenta" => Some(Color::Magenta),
        "yellow" => Some(Color::Yellow),
        "reset" => Some(Color::Reset),
        _ => None,
    }
}

fn parse_hex(hex: &str) -> Option<Color> {
    if !hex.is_ascii() {
        return None;
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        3 => Some(Color::Rgb(
            channel(&hex[0..1].repeat(2))?,
            channel(&hex[1..2].repeat(2))?,
            channel(&hex[2..3].repeat(2))?,
        )),
        6 => Some(Color::Rgb(
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
        )),
        _ => None,
    }
}

fn parse_rgb_components(inner: &str) -> Option<Color> {
    let parts: Vec<u16> = inner
        .split([',', ' '])
        .filter(|t| !t.is_empty())
        .map(|t| t.parse::<u16>().ok())
        .collect::<Option<_>>()?;
    match parts.as_slice() {
        [r, g, b] => Some(Color::Rgb(
            (*r).min(255) as u8,
            (*g).min(255) as u8,
            (*b).min(255) as u8,
        )),
        _ => None,
    }
}
