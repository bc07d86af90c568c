use crate::{keymap, model::Model, theme::Theme};
use ratatui::{Frame, layout::Rect};
use rig_core::{Cmd, Msg};

/// Runs a single tool directly from the command line. Leaving the tool
/// exits the program.
pub struct Standalone {
    tool: Box<dyn Model>,
}

impl Standalone {
    pub fn new(tool: Box<dyn Model>) -> Self {
        Self { tool }
    }
}

impl Model for Standalone {
    fn init(&mut self) -> Cmd {
        self.tool.init()
    }

    fn update(&mut self, msg: Msg) -> Cmd {
        match msg {
            Msg::Back => Cmd::quit(),
            Msg::Key(key) if keymap::is_ctrl_c(&key) => Cmd::quit(),
            other => self.tool.update(other),
        }
    }

    fn view(&self, f: &mut Frame, area: Rect, theme: &Theme) {
        self.tool.view(f, area, theme);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{Probe, ch, ctrl, render_model};

    #[test]
    fn test_back_quits() {
        let probe = Probe::named("t");
        let mut standalone = Standalone::new(Box::new(probe.clone()));
        assert!(standalone.update(Msg::Back).is_quit());
        assert!(probe.entries().is_empty());
    }

    #[test]
    fn test_tool_asking_for_back_ends_in_quit() {
        let probe = Probe::named("t");
        let mut standalone = Standalone::new(Box::new(probe.clone()));
        let msgs = standalone.update(ch('x')).run_inline();
        assert!(matches!(msgs.as_slice(), [Msg::Back]));
        let back = msgs.into_iter().next().unwrap();
        assert!(standalone.update(back).is_quit());
    }

    #[test]
    fn test_ctrl_c_quits() {
        let mut standalone = Standalone::new(Box::new(Probe::default()));
        assert!(standalone.update(ctrl('c')).is_quit());
    }

    #[test]
    fn test_delegates_init_update_view() {
        let probe = Probe::named("t");
        let mut standalone = Standalone::new(Box::new(probe.clone()));
        standalone.init();
        standalone.update(ch('a'));
        assert_eq!(probe.entries(), vec!["t init", "t key Char('a')"]);
        assert!(render_model(&standalone, 20, 2).contains("probe t"));
    }
}
