use crate::endpoint::Dispatcher;
use crate::session::ReviewMode;
use crate::ui::theme::Theme;
use crate::ui::App;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

pub(super) fn render_header<D: Dispatcher>(frame: &mut Frame, area: Rect, app: &App<D>) {
    let mode = app.session.mode();
    let mode_style = match mode {
        ReviewMode::Unset => Style::default().fg(Theme::YELLOW),
        ReviewMode::Global => Style::default().fg(Theme::GREEN),
        ReviewMode::Manual => Style::default()
            .fg(Theme::WHITE)
            .add_modifier(Modifier::BOLD),
    };
    let sep = format!(" {} ", Theme::DOT_SEPARATOR);

    let mut spans = vec![
        Span::styled("  fix-review", Theme::title()),
        Span::styled(sep.clone(), Theme::text_dim()),
        Span::styled(mode.to_string(), mode_style),
        Span::styled(sep, Theme::text_dim()),
    ];
    match app.session.current_file() {
        Some(file) => spans.push(Span::styled(file.to_string(), Theme::text())),
        None => spans.push(Span::styled("no file open", Theme::text_dim())),
    }
    if app.session.is_closed() {
        spans.push(Span::styled("  closing", Style::default().fg(Theme::YELLOW)));
    }

    let lines = vec![Line::from(""), Line::from(spans)];
    let header = Paragraph::new(lines).style(Style::default().bg(Theme::BG));
    frame.render_widget(header, area);
}
