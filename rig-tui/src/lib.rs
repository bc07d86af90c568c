pub mod app;
pub mod components;
pub mod home;
pub mod keymap;
pub mod model;
pub mod registry;
pub mod theme;
pub mod tools;

pub use app::{Shell, Standalone, run};
pub use home::Home;
pub use model::Model;
pub use registry::{Registry, RegistryBuilder, ToolDescriptor};
pub use theme::Theme;

#[cfg(test)]
pub(crate) mod test_support {
    use crate::{model::Model, theme::Theme};
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use ratatui::{Frame, Terminal, backend::TestBackend, layout::Rect, widgets::Paragraph};
    use rig_core::{Cmd, Msg};
    use std::sync::{Arc, Mutex};

    pub fn key(code: KeyCode) -> Msg {
        Msg::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    pub fn ch(c: char) -> Msg {
        key(KeyCode::Char(c))
    }

    pub fn ctrl(c: char) -> Msg {
        Msg::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL))
    }

    pub fn typed(text: &str) -> Vec<Msg> {
        text.chars().map(ch).collect()
    }

    pub fn render_to_string(width: u16, height: u16, draw: impl FnOnce(&mut Frame)) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(draw).unwrap();
        let buffer = terminal.backend().buffer().clone();
        let mut output = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                output.push(buffer[(x, y)].symbol().chars().next().unwrap_or(' '));
            }
            output.push('\n');
        }
        output
    }

    pub fn render_model(model: &dyn Model, width: u16, height: u16) -> String {
        let theme = Theme::default();
        render_to_string(width, height, |f| model.view(f, f.area(), &theme))
    }

    /// A screen that records what it receives. `x` asks to go back.
    #[derive(Clone, Default)]
    pub struct Probe {
        pub name: &'static str,
        pub log: Arc<Mutex<Vec<String>>>,
    }

    impl Probe {
        pub fn named(name: &'static str) -> Self {
            Self {
                name,
                log: Arc::default(),
            }
        }

        pub fn entries(&self) -> Vec<String> {
            self.log.lock().unwrap().clone()
        }

        fn record(&self, entry: String) {
            self.log.lock().unwrap().push(format!("{} {entry}", self.name));
        }
    }

    impl Model for Probe {
        fn init(&mut self) -> Cmd {
            self.record("init".to_string());
            Cmd::none()
        }

        fn update(&mut self, msg: Msg) -> Cmd {
            match msg {
                Msg::Key(k) if k.code == KeyCode::Char('x') => {
                    self.record("key x".to_string());
                    Cmd::message(Msg::Back)
                }
                Msg::Key(k) => {
                    self.record(format!("key {:?}", k.code));
                    Cmd::none()
                }
                Msg::Resize { width, height } => {
                    self.record(format!("resize {width}x{height}"));
                    Cmd::none()
                }
                Msg::Back => {
                    self.record("back".to_string());
                    Cmd::none()
                }
                other => {
                    self.record(format!("{other:?}"));
                    Cmd::none()
                }
            }
        }

        fn view(&self, f: &mut Frame, area: Rect, _theme: &Theme) {
            f.render_widget(Paragraph::new(format!("probe {}", self.name)), area);
        }
    }
}
