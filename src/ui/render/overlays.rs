use super::centered_rect;
use crate::ui::theme::Theme;
use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

fn key_row(key: &str, desc: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled("    ".to_string(), Style::default()),
        Span::styled(
            format!(" {:^7} ", key),
            Style::default().fg(Theme::GREY_900).bg(Theme::GREY_300),
        ),
        Span::styled(format!("  {}", desc), Style::default().fg(Theme::GREY_200)),
    ])
}

fn section(title: &str) -> Vec<Line<'static>> {
    vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("  {}", title),
            Style::default()
                .fg(Theme::WHITE)
                .add_modifier(Modifier::BOLD),
        )),
    ]
}

pub(super) fn render_help(frame: &mut Frame) {
    let area = centered_rect(55, 70, frame.area());
    frame.render_widget(Clear, area);

    let mut lines: Vec<Line<'static>> = Vec::new();
    lines.extend(section("Navigation"));
    lines.push(key_row("Tab", "Next panel"));
    lines.push(key_row("j / k", "Move down / up"));
    lines.push(key_row("PgUp/Dn", "Scroll source"));
    lines.push(key_row("↵", "Open file / inspect fix"));

    lines.extend(section("Review"));
    lines.push(key_row("g", "Global: apply every fix"));
    lines.push(key_row("m", "Manual: pick fixes yourself"));
    lines.push(key_row("␣", "Toggle fix (Manual only)"));
    lines.push(key_row("q", "End review and apply"));
    lines.push(key_row("Ctrl-C", "Leave now (selection is still sent)"));

    let help = Paragraph::new(lines).block(
        Block::default()
            .title(" Help ")
            .title_style(Style::default().fg(Theme::GREY_100))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Theme::GREY_400))
            .style(Style::default().bg(Theme::GREY_900)),
    );
    frame.render_widget(help, area);
}

pub(super) fn render_confirm_apply_all(frame: &mut Frame) {
    let area = centered_rect(50, 30, frame.area());
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "  No review mode was chosen.",
            Style::default()
                .fg(Theme::WHITE)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "  Ending now applies all fixes. Continue?",
            Theme::text(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("  ", Style::default()),
            Span::styled(" y ", Style::default().fg(Theme::GREY_900).bg(Theme::GREEN)),
            Span::styled(" apply all  ", Theme::text_muted()),
            Span::styled(" n ", Theme::key_chip()),
            Span::styled(" keep reviewing", Theme::text_muted()),
        ]),
    ];

    let dialog = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .title(" End review ")
                .title_style(Style::default().fg(Theme::GREY_100))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Theme::YELLOW))
                .style(Style::default().bg(Theme::GREY_700)),
        );
    frame.render_widget(dialog, area);
}
