mod executor;
mod shell;
mod standalone;

pub use executor::{EventSender, Flow, execute};
pub use shell::{HomeFactory, Shell};
pub use standalone::Standalone;

use crate::{model::Model, theme::Theme};
use crossterm::event::{self, Event, KeyEventKind};
use ratatui::DefaultTerminal;
use rig_core::Msg;
use std::time::Duration;

/// How long to wait for terminal input before checking for background results.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Drive `root` until it asks to quit.
///
/// Only this thread touches the model. Background work reports back over a
/// channel which is drained between terminal polls.
pub fn run(terminal: &mut DefaultTerminal, root: &mut dyn Model, theme: &Theme) -> anyhow::Result<()> {
    let (sender, rx) = EventSender::new();

    let mut flow = execute(root.init(), &sender);
    if flow == Flow::Continue {
        let size = terminal.size()?;
        flow = execute(
            root.update(Msg::Resize {
                width: size.width,
                height: size.height,
            }),
            &sender,
        );
    }

    while flow == Flow::Continue {
        terminal.draw(|f| root.view(f, f.area(), theme))?;

        // Check background channel (non-blocking)
        if let Ok(msg) = rx.try_recv() {
            flow = execute(root.update(msg), &sender);
            continue;
        }

        if !event::poll(POLL_INTERVAL)? {
            continue;
        }
        let msg = match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => Msg::Key(key),
            Event::Resize(width, height) => Msg::Resize { width, height },
            _ => continue,
        };
        flow = execute(root.update(msg), &sender);
    }

    Ok(())
}
