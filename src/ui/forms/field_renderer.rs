//! Field rendering utilities for forms

use crate::state::FormField;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Rows a field occupies: bordered input plus the inline error line
pub const FIELD_HEIGHT: u16 = 4;

/// Draw a form field with its invalid marker and inline error slot
pub fn draw_field(frame: &mut Frame, area: Rect, field: &FormField, is_active: bool) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Length(1)])
        .split(area);

    let border_style = match (field.invalid, is_active) {
        (true, _) => Style::default().fg(Color::Red),
        (false, true) => Style::default().fg(Color::Cyan),
        (false, false) => Style::default().fg(Color::DarkGray),
    };

    let text_style = if is_active {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };

    let display_value = field.display_value();
    let display_str = if display_value.is_empty() && !is_active {
        "(vacío)".to_string()
    } else {
        display_value
    };

    let cursor = if is_active && !field.is_checkbox() {
        "▌"
    } else {
        ""
    };

    let content = Paragraph::new(Line::from(vec![
        Span::styled(display_str, text_style),
        Span::styled(cursor, Style::default().fg(Color::Cyan)),
    ]));

    let title_style = if field.invalid {
        border_style.add_modifier(Modifier::BOLD)
    } else {
        border_style
    };
    let block = Block::default()
        .title(Span::styled(format!(" {} ", field.label), title_style))
        .borders(Borders::ALL)
        .border_style(border_style);

    frame.render_widget(content.block(block), chunks[0]);

    // Empty slot when the field is valid keeps the grid from jumping
    let error = field.error.as_deref().unwrap_or("");
    frame.render_widget(
        Paragraph::new(Span::styled(
            format!(" {error}"),
            Style::default().fg(Color::Red),
        )),
        chunks[1],
    );
}

/// Draw help text below a form
pub fn draw_help_text(frame: &mut Frame, area: Rect, text: &str) {
    let help = Paragraph::new(Line::from(Span::styled(
        text,
        Style::default().fg(Color::DarkGray),
    )));
    frame.render_widget(help, area);
}
