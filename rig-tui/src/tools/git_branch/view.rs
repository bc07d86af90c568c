use super::{Availability, GitBranch, View};
use crate::{
    components::{
        activity, centered_fixed_rect, dialog::Dialog, dialog_width, error_splash, text_field,
    },
    theme::Theme,
};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Padding, Paragraph},
};
use rig_core::{Branch, git::split_upstream};

pub(super) fn draw(f: &mut Frame, area: Rect, tool: &GitBranch, theme: &Theme) {
    if let Some(error) = tool.error() {
        error_splash::draw(f, area, error, theme);
        return;
    }

    let chunks = Layout::vertical([Constraint::Min(3), Constraint::Length(1)]).split(area);
    draw_list(f, chunks[0], tool, theme);
    f.render_widget(Paragraph::new(help_line(tool.view_state(), theme)), chunks[1]);

    match tool.view_state() {
        View::Browsing => {}
        View::Loading | View::Processing(_) => activity::draw(f, area, &tool.activity, theme),
        View::Editing => {
            let title = tool
                .target
                .as_ref()
                .map_or_else(|| "Rename".to_string(), |b| format!("Rename {}", b.name));
            let hint = Line::from(Span::styled(
                "enter rename  esc cancel",
                Style::default().fg(theme.muted),
            ));
            draw_input(f, area, &title, tool, hint, theme);
        }
        View::Creating => {
            let hint = availability_line(tool, theme);
            draw_input(f, area, "New branch", tool, hint, theme);
        }
        View::ConfirmingRemote => draw_confirm(f, area, tool, theme),
        View::ShowingResult => draw_results(f, area, tool, theme),
    }
}

fn branch_item<'a>(branch: &'a Branch, staged: bool, theme: &Theme) -> ListItem<'a> {
    let (marker, name_style) = if branch.is_current {
        (
            "* ",
            Style::default()
                .fg(theme.success)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        ("  ", Style::default())
    };

    let mut spans = vec![Span::styled(marker, name_style), Span::styled(&branch.name, name_style)];
    match &branch.upstream {
        Some(upstream) => spans.push(Span::styled(
            format!(" → {upstream}"),
            Style::default().fg(theme.muted),
        )),
        None => spans.push(Span::styled(" (local)", Style::default().fg(theme.muted))),
    }
    if staged {
        spans.push(Span::styled(
            "  delete? press d again",
            Style::default()
                .fg(theme.error)
                .add_modifier(Modifier::BOLD),
        ));
    }
    ListItem::new(Line::from(spans))
}

fn draw_list(f: &mut Frame, area: Rect, tool: &GitBranch, theme: &Theme) {
    let items: Vec<ListItem> = tool
        .branches()
        .iter()
        .enumerate()
        .map(|(i, branch)| branch_item(branch, tool.staged() == Some(i), theme))
        .collect();

    let title = Span::styled(
        format!(" Git Branch ({}) ", tool.branches().len()),
        Style::default().fg(theme.title).add_modifier(Modifier::BOLD),
    );
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .border_style(Style::default().fg(theme.border)),
        )
        .highlight_style(
            Style::default()
                .bg(theme.accent)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▸ ");

    let mut list_state = ListState::default();
    if !tool.branches().is_empty() {
        list_state.select(Some(tool.selected_index()));
    }
    f.render_stateful_widget(list, area, &mut list_state);
}

fn help_line(view: View, theme: &Theme) -> Line<'static> {
    let text = match view {
        View::Browsing => "enter switch  e rename  c create  d delete  r refresh  q back",
        View::Editing | View::Creating => "enter confirm  esc cancel",
        View::ConfirmingRemote => "y yes  n no  ←/→ choose  esc cancel",
        View::ShowingResult => "any key continue  q back",
        View::Loading | View::Processing(_) => "",
    };
    Line::from(Span::styled(text, Style::default().fg(theme.muted)))
}

fn availability_line(tool: &GitBranch, theme: &Theme) -> Line<'static> {
    match tool.availability() {
        Availability::Empty => Line::from(Span::styled(
            "enter a branch name",
            Style::default().fg(theme.muted),
        )),
        Availability::Exists => Line::from(Span::styled(
            "✗ branch already exists",
            Style::default().fg(theme.error),
        )),
        Availability::Available => Line::from(Span::styled(
            format!("✓ {} available", tool.input().text().trim()),
            Style::default().fg(theme.success),
        )),
    }
}

fn draw_input(f: &mut Frame, area: Rect, title: &str, tool: &GitBranch, hint: Line, theme: &Theme) {
    let popup = centered_fixed_rect(dialog_width(area.width), 4, area);
    f.render_widget(Clear, popup);
    let chunks = Layout::vertical([Constraint::Length(3), Constraint::Length(1)]).split(popup);
    text_field::draw(f, chunks[0], title, tool.input(), theme);
    f.render_widget(Paragraph::new(hint), chunks[1]);
}

fn draw_confirm(f: &mut Frame, area: Rect, tool: &GitBranch, theme: &Theme) {
    let upstream = tool
        .target
        .as_ref()
        .and_then(|b| b.upstream.as_deref())
        .unwrap_or_default();
    let (remote, _) = split_upstream(upstream);

    let selected = Style::default()
        .bg(theme.accent)
        .fg(Color::Black)
        .add_modifier(Modifier::BOLD);
    let (yes_style, no_style) = if tool.confirm_yes() {
        (selected, Style::default())
    } else {
        (Style::default(), selected)
    };

    let lines = vec![
        Line::from(vec![
            Span::raw("Also rename the branch on "),
            Span::styled(
                remote.to_string(),
                Style::default()
                    .fg(theme.accent)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("?"),
        ]),
        Line::raw(""),
        Line::from(vec![
            Span::styled(" Yes ", yes_style),
            Span::raw("   "),
            Span::styled(" No ", no_style),
        ]),
    ];
    Dialog::new(lines)
        .border_color(theme.accent)
        .title(" Remote branch ")
        .padding(Padding::horizontal(1))
        .alignment(Alignment::Center)
        .render(f, area);
}

fn draw_results(f: &mut Frame, area: Rect, tool: &GitBranch, theme: &Theme) {
    let mut lines: Vec<Line> = tool
        .results()
        .iter()
        .map(|line| {
            let (mark, color) = if line.ok {
                ("✓ ", theme.success)
            } else {
                ("✗ ", theme.error)
            };
            Line::from(vec![
                Span::styled(mark, Style::default().fg(color)),
                Span::raw(line.text.as_str()),
            ])
        })
        .collect();
    lines.push(Line::raw(""));
    lines.push(Line::from(Span::styled(
        "press any key to continue",
        Style::default().fg(theme.muted),
    )));

    let border = if tool.results().iter().all(|l| l.ok) {
        theme.success
    } else {
        theme.error
    };
    Dialog::new(lines)
        .border_color(border)
        .title(" Done ")
        .padding(Padding::uniform(1))
        .render(f, area);
}
