//! Layout components (header, field column, status bar)

use super::field_renderer::FIELD_HEIGHT;
use crate::app::App;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

const HINTS: &str = " Tab/S-Tab:field  ↑↓:option  Enter:submit  Esc:quit ";

/// Split into header, field column and status bar
pub fn create_layout(area: Rect) -> (Rect, Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Header
            Constraint::Min(0),    // Fields
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    (chunks[0], chunks[1], chunks[2])
}

/// Index of the first visible field and the slots to draw into.
///
/// Scrolls just far enough to keep `active` on screen.
pub fn visible_fields(area: Rect, count: usize, active: usize) -> (usize, Vec<Rect>) {
    let capacity = usize::from(area.height / FIELD_HEIGHT).max(1);
    let first = (active + 1).saturating_sub(capacity);
    let shown = count.saturating_sub(first).min(capacity);

    let slots = (0..shown)
        .map(|slot| Rect {
            x: area.x,
            y: area.y + slot as u16 * FIELD_HEIGHT,
            width: area.width,
            height: FIELD_HEIGHT.min(area.height),
        })
        .collect();
    (first, slots)
}

/// Draw the form title
pub fn draw_header(frame: &mut Frame, area: Rect, app: &App) {
    let title = app
        .form
        .title()
        .and_then(|title| title.get().ok())
        .map(|value| value.to_string())
        .filter(|text| !text.is_empty())
        .unwrap_or_else(|| app.form.name().to_string());

    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            format!(" {title} "),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("({} fields)", app.form.fields().len()),
            Style::default().fg(Color::DarkGray),
        ),
    ]));
    frame.render_widget(header, area);
}

/// Draw the status bar
pub fn draw_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![Span::styled(HINTS, Style::default().fg(Color::Gray))];

    let blocking = app.form.blocking_fields();
    if !blocking.is_empty() {
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(
            format!("blocked: {}", blocking.join(", ")),
            Style::default().fg(Color::Red),
        ));
    }

    if let Some(msg) = &app.status_message {
        let color = if msg.starts_with("Submitted") {
            Color::Green
        } else {
            Color::Yellow
        };
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(msg, Style::default().fg(color)));
    }

    let status = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(status, area);
}
