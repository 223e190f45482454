//! UI module for rendering the TUI

mod field_renderer;
mod layout;

use crate::app::App;
use ratatui::Frame;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &App) {
    let (header_area, fields_area, status_area) = layout::create_layout(frame.area());

    layout::draw_header(frame, header_area, app);

    let fields = app.form.fields();
    let (first, slots) = layout::visible_fields(fields_area, fields.len(), app.active);
    for (offset, area) in slots.into_iter().enumerate() {
        let index = first + offset;
        field_renderer::draw_field(frame, area, app, &fields[index], index == app.active);
    }

    layout::draw_status_bar(frame, status_area, app);
}
