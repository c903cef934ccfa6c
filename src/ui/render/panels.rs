use crate::endpoint::Dispatcher;
use crate::session::ReviewMode;
use crate::ui::theme::Theme;
use crate::ui::{ActivePanel, App};
use crate::util::{fit_width, truncate};
use crate::viewer::HighlightSpan;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

const DETAIL_HEIGHT: u16 = 6;

pub(super) fn render_panels<D: Dispatcher>(frame: &mut Frame, area: Rect, app: &App<D>) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(22),
            Constraint::Percentage(28),
            Constraint::Percentage(50),
        ])
        .split(area);

    render_files(frame, columns[0], app);
    render_fixes(frame, columns[1], app);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(4), Constraint::Length(DETAIL_HEIGHT)])
        .split(columns[2]);
    render_source(frame, right[0], app);
    render_detail(frame, right[1], app);
}

fn panel_block<D: Dispatcher>(title: &str, panel: ActivePanel, app: &App<D>) -> Block<'static> {
    let border = if app.active_panel == panel {
        Theme::border_active()
    } else {
        Theme::border()
    };
    Block::default()
        .title(format!(" {} ", title))
        .title_style(Theme::title())
        .borders(Borders::ALL)
        .border_style(border)
        .style(Style::default().bg(Theme::GREY_800))
}

/// First row to draw so that `selected` stays on screen
fn scroll_offset(selected: usize, visible: usize) -> usize {
    if visible == 0 {
        return 0;
    }
    selected.saturating_sub(visible - 1)
}

fn render_files<D: Dispatcher>(frame: &mut Frame, area: Rect, app: &App<D>) {
    let block = panel_block("FILES", ActivePanel::Files, app);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let tree = app.session.file_tree();
    if tree.is_empty() {
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(" loading files...", Theme::text_dim()))),
            inner,
        );
        return;
    }

    let visible = inner.height as usize;
    let offset = scroll_offset(app.tree_selected, visible);
    let width = inner.width as usize;
    let current = app.session.current_file();

    let lines: Vec<Line> = tree
        .iter()
        .enumerate()
        .skip(offset)
        .take(visible)
        .map(|(i, entry)| {
            let indent = "  ".repeat(entry.depth);
            let label = if entry.is_dir {
                format!("{}{} {}", indent, Theme::FOLDER, entry.name)
            } else {
                format!("{}  {}", indent, entry.name)
            };
            let is_open = !entry.is_dir
                && current.is_some_and(|f| entry.path.to_string_lossy() == f);
            let style = if i == app.tree_selected && app.active_panel == ActivePanel::Files {
                Theme::selected()
            } else if is_open {
                Style::default().fg(Theme::WHITE).add_modifier(Modifier::BOLD)
            } else if entry.is_dir {
                Theme::text_muted()
            } else {
                Theme::text()
            };
            Line::from(Span::styled(fit_width(&label, width), style))
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_fixes<D: Dispatcher>(frame: &mut Frame, area: Rect, app: &App<D>) {
    let fixes = app.session.fixes();
    let title = format!("FIXES ({} active)", fixes.active_ids().len());
    let block = panel_block(&title, ActivePanel::Fixes, app);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if app.session.current_file().is_none() {
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(" open a file", Theme::text_dim()))),
            inner,
        );
        return;
    }
    if !app.session.fixes_loaded() {
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(" loading fixes...", Theme::text_dim()))),
            inner,
        );
        return;
    }
    if fixes.is_empty() {
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(" no fixes in this file", Theme::text_dim()))),
            inner,
        );
        return;
    }

    let visible = inner.height as usize;
    let offset = scroll_offset(app.fix_selected, visible);
    let width = inner.width as usize;
    let locked = app.session.mode() != ReviewMode::Manual;
    let highlighted = app.session.highlighted_fix();
    let pending = app.session.pending_fix();

    let lines: Vec<Line> = fixes
        .records()
        .iter()
        .enumerate()
        .skip(offset)
        .take(visible)
        .map(|(i, record)| {
            let marker = if record.active {
                Theme::CHECKED
            } else {
                Theme::UNCHECKED
            };
            let pointer = if highlighted == Some(&record.id) {
                Theme::ARROW_RIGHT
            } else if pending == Some(&record.id) {
                '~'
            } else {
                ' '
            };
            let label = format!(
                "{}{}{} {} {}",
                pointer,
                "  ".repeat(record.depth),
                marker,
                record.id,
                record.mode.label()
            );

            let base = if record.active {
                Style::default().fg(Theme::GREEN)
            } else if locked {
                Theme::text_dim()
            } else {
                Theme::text()
            };
            let style = if i == app.fix_selected && app.active_panel == ActivePanel::Fixes {
                Theme::selected()
            } else {
                base
            };
            Line::from(Span::styled(fit_width(&label, width), style))
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_source<D: Dispatcher>(frame: &mut Frame, area: Rect, app: &App<D>) {
    let title = match app.session.current_file() {
        Some(file) => format!("SOURCE {}", truncate(file, 48)),
        None => "SOURCE".to_string(),
    };
    let block = panel_block(&title, ActivePanel::Source, app);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let viewer = app.session.viewer();
    let text = viewer.lines();
    if text.is_empty() {
        return;
    }

    let spans: Vec<&HighlightSpan> = viewer.highlights().collect();
    let gutter = text.len().to_string().len();
    let width = (inner.width as usize).saturating_sub(gutter + 1);

    let lines: Vec<Line> = text
        .iter()
        .enumerate()
        .skip(viewer.scroll_top())
        .take(inner.height as usize)
        .map(|(i, raw)| {
            let in_range = spans.iter().any(|s| s.contains_line(i));
            let number_style = if in_range {
                Style::default().fg(Theme::YELLOW)
            } else {
                Theme::text_dim()
            };
            let mut out = vec![Span::styled(format!("{:>gutter$} ", i + 1), number_style)];
            out.extend(source_spans(raw, i, &spans, width));
            Line::from(out)
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), inner);
}

/// Split one source line into plain and highlighted runs. Tabs render as a
/// single space so column offsets stay aligned with the text.
fn source_spans(
    raw: &str,
    line: usize,
    spans: &[&HighlightSpan],
    width: usize,
) -> Vec<Span<'static>> {
    let chars: Vec<char> = raw.chars().map(|c| if c == '\t' { ' ' } else { c }).collect();
    let range = spans
        .iter()
        .find_map(|s| s.columns_on(line, chars.len()));

    let piece = |from: usize, to: usize| -> String { chars[from..to].iter().collect() };
    let runs = match range {
        Some((start, end)) if start < end => vec![
            (piece(0, start), Theme::text()),
            (piece(start, end), Theme::highlight()),
            (piece(end, chars.len()), Theme::text()),
        ],
        _ => vec![(piece(0, chars.len()), Theme::text())],
    };

    let mut left = width;
    let mut out = Vec::new();
    for (text, style) in runs {
        if text.is_empty() || left == 0 {
            continue;
        }
        let fitted = fit_width(&text, left);
        left = left.saturating_sub(unicode_width::UnicodeWidthStr::width(fitted.as_str()));
        out.push(Span::styled(fitted, style));
    }
    out
}

fn render_detail<D: Dispatcher>(frame: &mut Frame, area: Rect, app: &App<D>) {
    let block = Block::default()
        .title(" DETAIL ")
        .title_style(Theme::title())
        .borders(Borders::ALL)
        .border_style(Theme::border())
        .style(Style::default().bg(Theme::GREY_800));

    let line = match (app.session.detail(), app.session.pending_fix()) {
        (_, Some(id)) => Line::from(Span::styled(
            format!(" loading fix {}...", id),
            Style::default().fg(Theme::YELLOW),
        )),
        (Some(detail), None) => Line::from(Span::styled(format!(" {}", detail), Theme::text())),
        (None, None) => Line::from(Span::styled(
            " select a fix and press enter",
            Theme::text_dim(),
        )),
    };

    let paragraph = Paragraph::new(line).block(block).wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(
        start_line: usize,
        start_offset: usize,
        end_line: usize,
        end_offset: usize,
    ) -> HighlightSpan {
        HighlightSpan {
            start_line,
            start_offset,
            end_line,
            end_offset,
        }
    }

    #[test]
    fn test_highlight_splits_line_into_runs() {
        let s = span(3, 4, 3, 9);
        let runs = source_spans("int total = a + b;", 3, &[&s], 80);
        let text: Vec<&str> = runs.iter().map(|r| r.content.as_ref()).collect();
        assert_eq!(text, vec!["int ", "total", " = a + b;"]);
        assert_eq!(runs[1].style, Theme::highlight());
    }

    #[test]
    fn test_tabs_keep_offsets_aligned() {
        let s = span(0, 1, 0, 2);
        let runs = source_spans("\tx = 1;", 0, &[&s], 80);
        assert_eq!(runs[1].content.as_ref(), "x");
    }

    #[test]
    fn test_line_outside_range_is_plain() {
        let s = span(5, 0, 6, 3);
        let runs = source_spans("return 0;", 2, &[&s], 80);
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].style, Theme::text());
    }

    #[test]
    fn test_runs_clipped_to_width() {
        let s = span(0, 2, 0, 6);
        let runs = source_spans("abcdefghij", 0, &[&s], 4);
        let joined: String = runs.iter().map(|r| r.content.as_ref()).collect();
        assert_eq!(joined, "abcd");
    }

    #[test]
    fn test_scroll_offset_keeps_selection_visible() {
        assert_eq!(scroll_offset(0, 10), 0);
        assert_eq!(scroll_offset(9, 10), 0);
        assert_eq!(scroll_offset(12, 10), 3);
        assert_eq!(scroll_offset(4, 0), 0);
    }
}
