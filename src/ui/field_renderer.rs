//! Field rendering for the bound form

use crate::app::{input_text, App};
use formbind::dom::MemoryNode;
use formbind::forms::Field;
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Rows taken by one field: borders, value line, hint line
pub const FIELD_HEIGHT: u16 = 4;

/// Draw a field from what its bound elements currently hold
pub fn draw_field(
    frame: &mut Frame,
    area: Rect,
    app: &App,
    field: &Field<MemoryNode>,
    is_active: bool,
) {
    let border_style = if field.is_blocking() {
        Style::default().fg(Color::Red)
    } else if is_active {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let value = input_text(field.input());
    let value_line = value_line(field, &value, is_active);

    let display = app.display_text(field.name());
    let description = field
        .description()
        .get()
        .map(|text| text.to_string())
        .unwrap_or_default();
    let hint_line = if !display.is_empty() {
        let color = if field.is_blocking() {
            Color::Red
        } else {
            Color::Green
        };
        Line::from(Span::styled(format!("→ {display}"), Style::default().fg(color)))
    } else {
        Line::from(Span::styled(description, Style::default().fg(Color::DarkGray)))
    };

    let label = field
        .title()
        .get()
        .map(|text| text.to_string())
        .unwrap_or_else(|_| field.name().to_string());
    let marker = if field.is_required() { " *" } else { "" };

    let block = Block::default()
        .title(format!(" {label}{marker} "))
        .borders(Borders::ALL)
        .border_style(border_style);

    frame.render_widget(
        Paragraph::new(vec![value_line, hint_line]).block(block),
        area,
    );
}

fn value_line<'a>(field: &Field<MemoryNode>, value: &str, is_active: bool) -> Line<'a> {
    let style = if is_active {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::Gray)
    };

    if let Some(options) = field.options() {
        let position = options
            .get_all()
            .iter()
            .position(|option| option == value)
            .map(|index| format!("  {}/{}", index + 1, options.length()))
            .unwrap_or_default();
        return Line::from(vec![
            Span::styled(format!("‹ {value} ›"), style),
            Span::styled(position, Style::default().fg(Color::DarkGray)),
        ]);
    }

    let cursor = if is_active { "▌" } else { "" };
    if value.is_empty() {
        let placeholder = field
            .placeholder()
            .and_then(|placeholder| placeholder.get().ok())
            .map(|text| text.to_string())
            .filter(|text| !text.is_empty());
        let shown = match placeholder {
            Some(text) => text,
            None if is_active => String::new(),
            None => "(empty)".to_string(),
        };
        return Line::from(vec![
            Span::styled(cursor, Style::default().fg(Color::Cyan)),
            Span::styled(shown, Style::default().fg(Color::DarkGray)),
        ]);
    }

    Line::from(vec![
        Span::styled(value.to_string(), style),
        Span::styled(cursor, Style::default().fg(Color::Cyan)),
    ])
}
