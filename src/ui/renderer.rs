use crate::core::app::App;
use crate::utils::scroll::{build_transcript_lines, max_scroll_offset, wrapped_line_count};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Paragraph, Wrap},
    Frame,
};

const INPUT_HEIGHT: u16 = 3;

/// Split the screen into the chat pane, the input box and the status line.
pub fn layout_chunks(area: Rect) -> [Rect; 3] {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(INPUT_HEIGHT),
            Constraint::Length(1),
        ])
        .split(area);
    [chunks[0], chunks[1], chunks[2]]
}

/// Largest scroll offset for the chat pane when the screen is `area`.
pub fn chat_max_offset(app: &App, area: Rect) -> u16 {
    let [chat, _, _] = layout_chunks(area);
    let lines = transcript_lines(app);
    // One row of the pane is taken by the title.
    let viewport = chat.height.saturating_sub(1);
    max_scroll_offset(wrapped_line_count(&lines, chat.width), viewport)
}

pub fn ui(f: &mut Frame, app: &App) {
    let area = f.area();
    let [chat, input, status] = layout_chunks(area);

    f.render_widget(
        Block::default().style(Style::default().bg(app.theme.background_color)),
        area,
    );

    let lines = transcript_lines(app);
    let scroll_offset = app.scroll.effective_offset(chat_max_offset(app, area));

    let messages = Paragraph::new(lines)
        .block(
            Block::default()
                .title(Span::styled(title(app), app.theme.title_style))
                .style(Style::default().bg(app.theme.background_color)),
        )
        .wrap(Wrap { trim: true })
        .scroll((scroll_offset, 0));
    f.render_widget(messages, chat);

    f.render_widget(&app.input, input);

    f.render_widget(
        Paragraph::new(Line::from(Span::styled(
            status_text(app),
            app.theme.status_style,
        ))),
        status,
    );
}

fn transcript_lines(app: &App) -> Vec<Line<'static>> {
    let indicator = app.conversation.indicator().label();
    build_transcript_lines(
        app.conversation.transcript(),
        indicator.as_deref(),
        &app.theme,
        app.clock,
    )
}

fn title(app: &App) -> String {
    let mut title = format!(
        " fundbot v{} • {} • {}",
        env!("CARGO_PKG_VERSION"),
        app.endpoint,
        app.theme_mode.glyph()
    );
    if let Some(mic) = app.voice.glyph() {
        title.push_str(" • ");
        title.push_str(mic);
    }
    title.push_str(&format!(" • log: {} ", app.logging.get_status_string()));
    title
}

fn status_text(app: &App) -> String {
    if let Some(status) = &app.status {
        return status.clone();
    }
    let mut hints = String::from("Enter send • Ctrl+T theme");
    if app.voice.is_available() {
        hints.push_str(" • F2 mic");
    }
    hints.push_str(" • ↑/↓ PgUp/PgDn scroll • Esc quit");
    hints
}
