use super::{TestChanged, View};
use crate::{
    components::{activity, error_splash},
    theme::Theme,
};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

/// Lines of output shown while tests are still running.
const RUNNING_TAIL: usize = 30;

pub(super) fn draw(f: &mut Frame, area: Rect, tool: &TestChanged, theme: &Theme) {
    if let Some(error) = tool.error() {
        error_splash::draw(f, area, error, theme);
        return;
    }

    let chunks = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(3),
        Constraint::Length(1),
    ])
    .split(area);

    match tool.view_state() {
        View::Loading | View::Browsing => {
            draw_summary(f, chunks[0], tool, theme);
            draw_targets(f, chunks[1], tool, theme);
        }
        View::Running => {
            f.render_widget(
                Paragraph::new(activity::status_line(&tool.activity, theme)).block(bordered(theme)),
                chunks[0],
            );
            draw_running_output(f, chunks[1], tool, theme);
        }
        View::Results => {
            draw_results_header(f, chunks[0], tool, theme);
            draw_results_output(f, chunks[1], tool, theme);
        }
    }

    let help = match tool.view_state() {
        View::Browsing => "enter run  ↑/↓ move  r refresh  q back",
        View::Results => "↑/↓ scroll  pgup/pgdn page  r rerun  q back",
        View::Loading | View::Running => "ctrl-c quit",
    };
    f.render_widget(
        Paragraph::new(Line::from(Span::styled(help, Style::default().fg(theme.muted)))),
        chunks[2],
    );

    if tool.view_state() == View::Loading {
        activity::draw(f, area, &tool.activity, theme);
    }
}

fn bordered(theme: &Theme) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border))
}

fn draw_summary(f: &mut Frame, area: Rect, tool: &TestChanged, theme: &Theme) {
    let muted = Style::default().fg(theme.muted);
    let line = match tool.discovery() {
        Some(d) => Line::from(vec![
            Span::styled("base ", muted),
            Span::raw(format!("origin/{}", d.default_branch)),
            Span::styled("  changed ", muted),
            Span::raw(d.changed_files.len().to_string()),
            Span::styled("  runner ", muted),
            Span::raw(d.runner.clone().unwrap_or_else(|| "none".to_string())),
        ]),
        None => Line::from(Span::styled("No changes loaded", muted)),
    };
    let block = bordered(theme).title(Span::styled(
        " Test Changed ",
        Style::default().fg(theme.title).add_modifier(Modifier::BOLD),
    ));
    f.render_widget(Paragraph::new(line).block(block), area);
}

fn draw_targets(f: &mut Frame, area: Rect, tool: &TestChanged, theme: &Theme) {
    let block = bordered(theme).title(format!(" {} targets ", tool.targets().len()));
    if tool.targets().is_empty() {
        let empty = Line::from(Span::styled(
            "No affected test targets found.",
            Style::default().fg(theme.muted),
        ));
        f.render_widget(Paragraph::new(empty).block(block), area);
        return;
    }

    let items: Vec<ListItem> = tool
        .targets()
        .iter()
        .map(|t| ListItem::new(t.as_str()))
        .collect();
    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(theme.accent)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▸ ");
    let mut state = ListState::default();
    state.select(Some(tool.selected_index()));
    f.render_stateful_widget(list, area, &mut state);
}

/// Colour test runner output: passes green, failures red.
fn output_line<'a>(line: &'a str, theme: &Theme) -> Line<'a> {
    let trimmed = line.trim_start();
    let style = if trimmed.starts_with("--- FAIL") || trimmed.starts_with("FAIL") {
        Style::default().fg(theme.error)
    } else if trimmed.starts_with("--- PASS") || trimmed.starts_with("ok") {
        Style::default().fg(theme.success)
    } else {
        Style::default()
    };
    Line::from(Span::styled(line, style))
}

fn draw_running_output(f: &mut Frame, area: Rect, tool: &TestChanged, theme: &Theme) {
    let visible = usize::from(area.height.saturating_sub(2)).min(RUNNING_TAIL);
    let skip = tool.output().len().saturating_sub(visible);
    let lines: Vec<Line> = tool
        .output()
        .iter()
        .skip(skip)
        .map(|l| output_line(l, theme))
        .collect();
    f.render_widget(Paragraph::new(lines).block(bordered(theme).title(" output ")), area);
}

fn draw_results_header(f: &mut Frame, area: Rect, tool: &TestChanged, theme: &Theme) {
    let (text, color) = if tool.passed() == Some(true) {
        ("✓ Tests passed", theme.success)
    } else {
        ("✗ Tests failed", theme.error)
    };
    let line = Line::from(vec![
        Span::styled(text, Style::default().fg(color).add_modifier(Modifier::BOLD)),
        Span::styled(
            format!("  {}", activity::format_elapsed(tool.activity.elapsed())),
            Style::default().fg(theme.muted),
        ),
    ]);
    f.render_widget(Paragraph::new(line).block(bordered(theme)), area);
}

fn draw_results_output(f: &mut Frame, area: Rect, tool: &TestChanged, theme: &Theme) {
    let visible = usize::from(area.height.saturating_sub(2));
    let max_scroll = tool.output().len().saturating_sub(visible);
    let offset = tool.scroll().min(max_scroll);
    let lines: Vec<Line> = tool
        .output()
        .iter()
        .skip(offset)
        .take(visible)
        .map(|l| output_line(l, theme))
        .collect();
    let title = format!(" output {}/{} ", offset + lines.len(), tool.output().len());
    f.render_widget(Paragraph::new(lines).block(bordered(theme).title(title)), area);
}
