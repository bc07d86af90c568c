use crate::{keymap, model::Model, registry::Registry, theme::Theme};
use ratatui::{Frame, layout::Rect};
use rig_core::{Cmd, Msg};
use std::sync::Arc;

/// Builds the home screen. Called at startup and on every return from a tool.
pub type HomeFactory = Box<dyn Fn() -> Box<dyn Model>>;

/// Owns the active screen and swaps it on navigation.
pub struct Shell {
    registry: Arc<Registry>,
    home: HomeFactory,
    child: Box<dyn Model>,
    size: Option<(u16, u16)>,
}

impl Shell {
    pub fn new<F>(registry: Arc<Registry>, home: F) -> Self
    where
        F: Fn() -> Box<dyn Model> + 'static,
    {
        let child = home();
        Self {
            registry,
            home: Box::new(home),
            child,
            size: None,
        }
    }

    /// Make `child` the active screen and start it at the current size.
    fn enter(&mut self, child: Box<dyn Model>) -> Cmd {
        self.child = child;
        let init = self.child.init();
        let replay = match self.size {
            Some((width, height)) => Cmd::message(Msg::Resize { width, height }),
            None => Cmd::none(),
        };
        Cmd::batch([init, replay])
    }
}

impl Model for Shell {
    fn init(&mut self) -> Cmd {
        self.child.init()
    }

    fn update(&mut self, msg: Msg) -> Cmd {
        match msg {
            Msg::Key(key) if keymap::is_ctrl_c(&key) => Cmd::quit(),
            Msg::ToolSelected(id) => match self.registry.instantiate(&id) {
                Some(tool) => {
                    log::info!("opening tool {id}");
                    self.enter(tool)
                }
                None => {
                    log::debug!("no tool registered as {id}");
                    Cmd::none()
                }
            },
            Msg::Back => {
                let home = (self.home)();
                self.enter(home)
            }
            Msg::Resize { width, height } => {
                self.size = Some((width, height));
                self.child.update(msg)
            }
            other => self.child.update(other),
        }
    }

    fn view(&self, f: &mut Frame, area: Rect, theme: &Theme) {
        self.child.view(f, area, theme);
    }
}
