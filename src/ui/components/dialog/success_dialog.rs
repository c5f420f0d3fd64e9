//! Registration success dialog

use super::base::{render_dialog, DialogConfig};
use ratatui::{
    style::{Color, Modifier, Style},
    text::Span,
    Frame,
};

/// Render the success message with a countdown to the automatic reset.
///
/// `progress` is how far the reset delay has elapsed, in `0.0..=1.0`.
pub fn render_success_dialog(frame: &mut Frame, progress: f32) {
    let hint = vec![
        Span::raw("Pulsa "),
        Span::styled(
            "cualquier tecla",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" para empezar de nuevo"),
    ];

    // Remaining time drains on an ease-out curve
    let eased = simple_easing::cubic_out(progress.clamp(0.0, 1.0));

    render_dialog(
        frame,
        DialogConfig {
            title: "¡Registro exitoso!",
            title_color: Color::Green,
            border_color: Color::Green,
            message: "Tu cuenta fue creada correctamente.\nEl formulario se reiniciará en unos segundos.",
            hint: Some(hint),
            max_width: 60,
            progress: Some(f64::from(1.0 - eased)),
        },
    );
}
