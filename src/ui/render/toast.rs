use crate::ui::theme::Theme;
use crate::ui::{Toast, ToastKind};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, Paragraph},
    Frame,
};

pub(super) fn render_toast(frame: &mut Frame, toast: &Toast) {
    let area = frame.area();

    let (prefix, bg, text_style) = match toast.kind {
        ToastKind::Success => (
            "  + ",
            Theme::GREEN,
            Style::default()
                .fg(Theme::WHITE)
                .add_modifier(Modifier::BOLD),
        ),
        ToastKind::Error => ("  x ", Theme::RED, Style::default().fg(Theme::WHITE)),
        ToastKind::Info => (
            "  › ",
            Theme::GREY_700,
            Style::default()
                .fg(Theme::GREY_100)
                .add_modifier(Modifier::ITALIC),
        ),
    };
    let suffix = "  ";

    let width = (prefix.chars().count() + toast.message.chars().count() + suffix.len()) as u16;
    let toast_area = Rect {
        x: (area.width.saturating_sub(width)) / 2,
        y: area.height.saturating_sub(4),
        width: width.min(area.width),
        height: 1u16.min(area.height),
    };

    frame.render_widget(Clear, toast_area);

    let content = Paragraph::new(Line::from(vec![
        Span::styled(prefix, Style::default().fg(Theme::WHITE)),
        Span::styled(toast.message.as_str(), text_style),
        Span::styled(suffix, Style::default()),
    ]))
    .style(Style::default().bg(bg));
    frame.render_widget(content, toast_area);
}
