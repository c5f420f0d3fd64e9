//! Registration form rendering

use super::field_renderer::{draw_field, draw_help_text, FIELD_HEIGHT};
use crate::app::App;
use crate::captcha::ChallengeCaptcha;
use crate::platform::SUBMIT_SHORTCUT;
use crate::state::Focus;
use crate::ui::components::{render_button, BUTTON_HEIGHT};
use crate::validation::FieldId;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use std::time::Instant;

/// Fields laid out two per row
const FIELD_ROWS: [[FieldId; 2]; 4] = [
    [FieldId::Name, FieldId::Email],
    [FieldId::Password, FieldId::ConfirmPassword],
    [FieldId::Birthdate, FieldId::Mobile],
    [FieldId::Landline, FieldId::Terms],
];

/// Rows of the CAPTCHA panel including its borders
const CAPTCHA_HEIGHT: u16 = 6;

/// Draw the registration form
pub fn draw_registration(frame: &mut Frame, area: Rect, app: &App, now: Instant) {
    let block = Block::default()
        .title(" Registro ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(FIELD_HEIGHT * FIELD_ROWS.len() as u16), // Fields
            Constraint::Length(CAPTCHA_HEIGHT),                         // CAPTCHA
            Constraint::Length(BUTTON_HEIGHT),                          // Submit
            Constraint::Min(0),
            Constraint::Length(1), // Help
        ])
        .horizontal_margin(1)
        .split(inner);

    draw_fields(frame, chunks[0], app);
    draw_captcha_panel(frame, chunks[1], app, now);
    draw_submit(frame, chunks[2], app);
    draw_help_text(
        frame,
        chunks[4],
        &format!("Los campos en rojo tienen errores. {SUBMIT_SHORTCUT} envía el formulario."),
    );
}

fn draw_fields(frame: &mut Frame, area: Rect, app: &App) {
    let form = app.controller.form();
    let focus = app.controller.focus();

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(FIELD_ROWS.map(|_| Constraint::Length(FIELD_HEIGHT)))
        .split(area);

    for (row, ids) in rows.iter().zip(FIELD_ROWS) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(*row);

        for (column, id) in columns.iter().zip(ids) {
            draw_field(frame, *column, form.field(id), focus == Focus::Field(id));
        }
    }
}

fn draw_captcha_panel(frame: &mut Frame, area: Rect, app: &App, now: Instant) {
    let captcha = app.controller.captcha();
    let is_active = app.controller.focus() == Focus::Captcha;

    let border_color = match (app.controller.captcha_message().is_some(), is_active) {
        (true, _) => Color::Red,
        (false, true) => Color::Cyan,
        (false, false) => Color::DarkGray,
    };

    let block = Block::default()
        .title(" CAPTCHA ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));

    let mut lines = vec![challenge_line(captcha, is_active, now)];

    if let Some(feedback) = &captcha.feedback {
        lines.push(Line::from(Span::styled(
            feedback.as_str(),
            Style::default().fg(Color::Yellow),
        )));
    }
    if let Some(message) = app.controller.captcha_message() {
        lines.push(Line::from(Span::styled(
            message,
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )));
    }

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn challenge_line(captcha: &ChallengeCaptcha, is_active: bool, now: Instant) -> Line<'static> {
    if let Some(remaining) = captcha.remaining(now) {
        return Line::from(vec![
            Span::styled("✓ Verificado", Style::default().fg(Color::Green)),
            Span::styled(
                format!("  (expira en {}s)", remaining.as_secs()),
                Style::default().fg(Color::DarkGray),
            ),
        ]);
    }

    let cursor = if is_active { "▌" } else { "" };
    Line::from(vec![
        Span::raw(format!("{} ", captcha.prompt())),
        Span::styled(
            captcha.input().to_string(),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::styled(cursor, Style::default().fg(Color::Cyan)),
    ])
}

fn draw_submit(frame: &mut Frame, area: Rect, app: &App) {
    let button_area = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(24), Constraint::Min(0)])
        .split(area)[0];

    render_button(
        frame,
        button_area,
        "Registrarse",
        app.controller.focus() == Focus::Submit,
        app.controller.submit_enabled(),
    );
}
