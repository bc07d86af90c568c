use crate::theme::Theme;
use ratatui::{
    Frame,
    layout::{Position, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use rig_core::state::TextInput;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Byte range of `text` to show so the cursor stays inside `max_width` columns,
/// plus the cursor's column within that range.
fn visible_range(text: &str, cursor: usize, max_width: usize) -> (usize, usize, u16) {
    if max_width == 0 {
        return (0, 0, 0);
    }
    let before = &text[..cursor];
    let mut start = 0;
    let mut cursor_col = before.width();
    // Drop graphemes from the left until the cursor fits.
    for (idx, g) in before.grapheme_indices(true) {
        if cursor_col < max_width {
            break;
        }
        start = idx + g.len();
        cursor_col -= g.width();
    }

    let mut end = start;
    let mut used = 0;
    for (idx, g) in text[start..].grapheme_indices(true) {
        if used + g.width() > max_width {
            break;
        }
        used += g.width();
        end = start + idx + g.len();
    }
    (start, end, u16::try_from(cursor_col).unwrap_or(u16::MAX))
}

/// Bordered single-line input with a visible terminal cursor.
pub fn draw(f: &mut Frame, area: Rect, title: &str, input: &TextInput, theme: &Theme) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.accent))
        .title(Span::styled(format!(" {title} "), Style::default().fg(theme.title)));
    let inner = block.inner(area);

    let (start, end, cursor_col) =
        visible_range(input.text(), input.cursor(), usize::from(inner.width));
    let paragraph = Paragraph::new(Line::raw(&input.text()[start..end])).block(block);
    f.render_widget(paragraph, area);

    if inner.width > 0 && inner.height > 0 {
        f.set_cursor_position(Position::new(
            inner.x + cursor_col.min(inner.width - 1),
            inner.y,
        ));
    }
}
