mod footer;
mod header;
mod overlays;
mod panels;
mod toast;


use crate::endpoint::Dispatcher;
use crate::ui::theme::Theme;
use crate::ui::{App, Overlay};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    widgets::Block,
    Frame,
};

use footer::render_footer;
use header::render_header;
use overlays::{render_confirm_apply_all, render_help};
use panels::render_panels;
use toast::render_toast;

/// Main render function
pub fn render<D: Dispatcher>(frame: &mut Frame, app: &App<D>) {
    let area = frame.area();

    frame.render_widget(Block::default().style(Style::default().bg(Theme::BG)), area);

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Header
            Constraint::Min(8),    // Panels
            Constraint::Length(2), // Footer
        ])
        .split(area);

    render_header(frame, layout[0], app);
    render_panels(frame, layout[1], app);
    render_footer(frame, layout[2], app);

    match app.overlay {
        Overlay::Help => render_help(frame),
        Overlay::ConfirmApplyAll => render_confirm_apply_all(frame),
        Overlay::None => {}
    }

    if let Some(toast) = &app.toast {
        render_toast(frame, toast);
    }
}

/// Create a centered rect using up certain percentage of the available rect
pub(super) fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
