use crate::endpoint::Dispatcher;
use crate::session::ReviewMode;
use crate::ui::theme::Theme;
use crate::ui::{ActivePanel, App};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

fn hint(spans: &mut Vec<Span<'static>>, key: &'static str, label: &'static str) {
    spans.push(Span::styled(format!(" {} ", key), Theme::key_chip()));
    spans.push(Span::styled(format!(" {} ", label), Theme::key_label()));
}

pub(super) fn render_footer<D: Dispatcher>(frame: &mut Frame, area: Rect, app: &App<D>) {
    let mut spans = vec![Span::styled("  ", Style::default())];
    spans.push(Span::styled(app.endpoint.clone(), Theme::text_dim()));

    let mut buttons: Vec<Span<'static>> = Vec::new();
    match app.active_panel {
        ActivePanel::Files => hint(&mut buttons, "↵", "open"),
        ActivePanel::Fixes => {
            hint(&mut buttons, "↵", "inspect");
            if app.session.mode() == ReviewMode::Manual {
                hint(&mut buttons, "␣", "toggle");
            }
        }
        ActivePanel::Source => hint(&mut buttons, "j/k", "scroll"),
    }
    if app.session.mode() != ReviewMode::Global {
        hint(&mut buttons, "g", "global");
    }
    if app.session.mode() != ReviewMode::Manual {
        hint(&mut buttons, "m", "manual");
    }
    hint(&mut buttons, "?", "help");
    hint(&mut buttons, "q", "end review");

    // Right-align the buttons
    let status_len: usize = spans.iter().map(|s| s.content.chars().count()).sum();
    let buttons_len: usize = buttons.iter().map(|s| s.content.chars().count()).sum();
    let spacer_len = (area.width as usize).saturating_sub(status_len + buttons_len + 1);
    if spacer_len > 0 {
        spans.push(Span::styled(" ".repeat(spacer_len), Style::default()));
    }
    spans.extend(buttons);

    let footer = Paragraph::new(vec![Line::from(""), Line::from(spans)])
        .style(Style::default().bg(Theme::GREY_900));
    frame.render_widget(footer, area);
}
