//! UI module for rendering the TUI

mod components;
mod forms;
mod layout;

use crate::app::App;
use ratatui::Frame;
use std::time::Instant;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &App) {
    let main_area = layout::create_layout(frame.area());

    if app.controller.form_visible() {
        forms::draw_registration(frame, main_area, app, Instant::now());
    } else {
        components::render_success_dialog(
            frame,
            app.controller.reset_progress(Instant::now()),
        );
    }

    // Draw status bar
    layout::draw_status_bar(frame, app);
}
