use super::dialog::Dialog;
use crate::theme::Theme;
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, Padding},
};

fn build_error_dialog<'a>(error: &'a str, theme: &Theme) -> Dialog<'a> {
    let text = Line::from(vec![
        Span::styled(
            "Error: ",
            Style::default()
                .fg(theme.error)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(error),
    ]);

    let hint = Line::from(Span::styled(
        "press any key to continue",
        Style::default().fg(theme.muted),
    ));

    Dialog::new(vec![text, Line::raw(""), hint])
        .border_color(theme.error)
        .title(" Error ")
        .padding(Padding::uniform(1))
        .alignment(Alignment::Center)
}

/// Replace the whole view with an error message.
pub fn draw(f: &mut Frame, area: Rect, error: &str, theme: &Theme) {
    f.render_widget(Clear, area);
    build_error_dialog(error, theme).render(f, area);
}
