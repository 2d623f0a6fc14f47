use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};

use crate::core::message::{ClockFormat, Message};
use crate::core::transcript::Transcript;
use crate::ui::theme::Theme;

/// Build the chat pane lines for every transcript entry, followed by the
/// typing indicator when one is showing.
pub fn build_transcript_lines(
    transcript: &Transcript,
    indicator: Option<&str>,
    theme: &Theme,
    clock: ClockFormat,
) -> Vec<Line<'static>> {
    let mut lines = Vec::with_capacity(transcript.len() * 3 + 1);
    for message in transcript {
        add_message_lines(&mut lines, message, theme, clock);
    }
    if let Some(label) = indicator {
        lines.push(Line::from(Span::styled(
            label.to_string(),
            theme.indicator_style,
        )));
    }
    lines
}

fn add_message_lines(
    lines: &mut Vec<Line<'static>>,
    message: &Message,
    theme: &Theme,
    clock: ClockFormat,
) {
    let (prefix_style, text_style) = if message.is_from_bot {
        (theme.bot_prefix_style, theme.bot_text_style)
    } else {
        (theme.user_prefix_style, theme.user_text_style)
    };

    let mut text_lines = message.text.lines();
    let first = text_lines.next().unwrap_or_default();
    lines.push(Line::from(vec![
        Span::styled(format!("{}: ", message.sender), prefix_style),
        Span::styled(first.to_string(), text_style),
    ]));
    for rest in text_lines {
        lines.push(Line::from(Span::styled(rest.to_string(), text_style)));
    }

    lines.push(Line::from(Span::styled(
        message.formatted_time(clock),
        theme.timestamp_style,
    )));
    lines.push(Line::from(""));
}

/// How many terminal rows `lines` occupy once word-wrapped to `width`.
///
/// Counted with the same wrapper the chat pane renders with, so follow mode
/// lands exactly on the last row.
pub fn wrapped_line_count(lines: &[Line], width: u16) -> u16 {
    if width == 0 {
        return u16::try_from(lines.len()).unwrap_or(u16::MAX);
    }
    let rows = Paragraph::new(lines.to_vec())
        .wrap(Wrap { trim: true })
        .line_count(width);
    u16::try_from(rows).unwrap_or(u16::MAX)
}

pub fn max_scroll_offset(total_rows: u16, viewport_height: u16) -> u16 {
    total_rows.saturating_sub(viewport_height)
}

/// Scroll position of the chat pane. While following, the newest entry is
/// always in view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollState {
    offset: u16,
    follow: bool,
}

impl Default for ScrollState {
    fn default() -> Self {
        Self {
            offset: 0,
            follow: true,
        }
    }
}

impl ScrollState {
    pub fn is_following(&self) -> bool {
        self.follow
    }

    pub fn effective_offset(&self, max_offset: u16) -> u16 {
        if self.follow {
            max_offset
        } else {
            self.offset.min(max_offset)
        }
    }

    pub fn scroll_up(&mut self, rows: u16, max_offset: u16) {
        self.offset = self.effective_offset(max_offset).saturating_sub(rows);
        self.follow = self.offset >= max_offset;
    }

    pub fn scroll_down(&mut self, rows: u16, max_offset: u16) {
        let next = self.effective_offset(max_offset).saturating_add(rows);
        self.offset = next.min(max_offset);
        self.follow = next >= max_offset;
    }

    pub fn scroll_to_top(&mut self, max_offset: u16) {
        self.offset = 0;
        self.follow = max_offset == 0;
    }

    pub fn follow_bottom(&mut self) {
        self.follow = true;
    }
}
