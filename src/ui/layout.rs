//! Layout components (content area, status bar)

use crate::app::App;
use crate::platform::SUBMIT_SHORTCUT;
use crate::state::Focus;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Create the main layout, reserving the bottom line for the status bar
pub fn create_layout(area: Rect) -> Rect {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    chunks[0]
}

/// Draw the status bar
pub fn draw_status_bar(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let status_area = Rect {
        x: 0,
        y: area.height.saturating_sub(1),
        width: area.width,
        height: 1,
    };

    let mut spans = vec![];

    // Submit readiness
    let ready = if app.controller.submit_enabled() {
        Span::styled(" ● ", Style::default().fg(Color::Green))
    } else {
        Span::styled(" ○ ", Style::default().fg(Color::Red))
    };
    spans.push(ready);

    let hints = get_focus_hints(app);
    spans.push(Span::styled(hints, Style::default().fg(Color::Gray)));

    if let Some(msg) = &app.status_message {
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(msg, Style::default().fg(Color::Yellow)));
    }

    let status = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(status, status_area);

    let quit_hint = " ^C:salir ";
    let quit_area = Rect {
        x: area.width.saturating_sub(quit_hint.len() as u16),
        y: area.height.saturating_sub(1),
        width: quit_hint.len() as u16,
        height: 1,
    };
    let quit_widget =
        Paragraph::new(quit_hint).style(Style::default().bg(Color::DarkGray).fg(Color::Gray));
    frame.render_widget(quit_widget, quit_area);
}

/// Get keyboard hints for whatever has focus
fn get_focus_hints(app: &App) -> String {
    if app.controller.success_visible() {
        return "Pulsa cualquier tecla para empezar de nuevo".to_string();
    }

    match app.controller.focus() {
        Focus::Field(field) if field.is_checkbox() => {
            format!("Tab:siguiente  Espacio:marcar  {SUBMIT_SHORTCUT}:enviar  Esc:salir")
        }
        Focus::Field(_) => {
            format!("Tab:siguiente  S-Tab:anterior  {SUBMIT_SHORTCUT}:enviar  Esc:salir")
        }
        Focus::Captcha => "0-9:respuesta  Enter:comprobar  Tab:siguiente".to_string(),
        Focus::Submit => "Enter:enviar  S-Tab:anterior  Esc:salir".to_string(),
    }
}
