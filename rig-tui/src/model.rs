use crate::theme::Theme;
use ratatui::{Frame, layout::Rect};
use rig_core::{Cmd, Msg};

/// A screen driven by messages.
///
/// `update` is the only place state changes. It consumes one message and
/// returns the follow-up work as a [`Cmd`]; it must never block. `view`
/// renders the current state and has no side effects.
pub trait Model {
    /// Work to start when the screen becomes active.
    fn init(&mut self) -> Cmd;

    fn update(&mut self, msg: Msg) -> Cmd;

    fn view(&self, f: &mut Frame, area: Rect, theme: &Theme);
}
