use ratatui::layout::Rect;

pub mod activity;
pub mod dialog;
pub mod error_splash;
pub mod text_field;

/// Center a rect of fixed size, shrinking it to fit `r`.
pub fn centered_fixed_rect(width: u16, height: u16, r: Rect) -> Rect {
    let width = width.min(r.width);
    let height = height.min(r.height);
    Rect {
        x: r.x + (r.width - width) / 2,
        y: r.y + (r.height - height) / 2,
        width,
        height,
    }
}

/// Popup width: 60% of the terminal, at least 40 columns, never wider than it.
pub fn dialog_width(terminal_width: u16) -> u16 {
    (terminal_width / 5 * 3).max(40).min(terminal_width)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_fixed_rect() {
        let r = centered_fixed_rect(10, 4, Rect::new(0, 0, 30, 10));
        assert_eq!(r, Rect::new(10, 3, 10, 4));
    }

    #[test]
    fn test_centered_fixed_rect_clamps() {
        let r = centered_fixed_rect(50, 50, Rect::new(2, 2, 20, 10));
        assert_eq!(r, Rect::new(2, 2, 20, 10));
    }

    #[test]
    fn test_dialog_width() {
        assert_eq!(dialog_width(100), 60);
        assert_eq!(dialog_width(50), 40);
        assert_eq!(dialog_width(30), 30);
    }
}
