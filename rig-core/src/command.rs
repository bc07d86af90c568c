use crate::message::Msg;
use std::{fmt, time::Duration};

/// Delay between animation ticks while a screen waits on background work.
pub const TICK_INTERVAL: Duration = Duration::from_millis(100);

/// A unit of background work. Runs once and produces exactly one message.
pub type Task = Box<dyn FnOnce() -> Msg + Send + 'static>;

/// Deferred work returned from `init` and `update`.
///
/// Screens never perform I/O themselves. They describe what should happen
/// and the event loop runs it off the UI thread, feeding the resulting
/// message back into the next `update` call.
pub enum Cmd {
    /// Nothing to do
    None,
    /// Stop the event loop
    Quit,
    /// Run a task on a worker thread and deliver its message
    Perform(Task),
    /// Sleep for `delay`, then deliver `Msg::Tick { tag }`
    Tick { delay: Duration, tag: u64 },
    /// Run every child concurrently. No ordering between their messages.
    Batch(Vec<Cmd>),
}

impl Cmd {
    pub fn none() -> Self {
        Self::None
    }

    pub fn quit() -> Self {
        Self::Quit
    }

    pub fn perform<F>(task: F) -> Self
    where
        F: FnOnce() -> Msg + Send + 'static,
    {
        Self::Perform(Box::new(task))
    }

    /// A command that immediately yields `msg`.
    pub fn message(msg: Msg) -> Self {
        Self::perform(move || msg)
    }

    pub fn tick(tag: u64) -> Self {
        Self::Tick {
            delay: TICK_INTERVAL,
            tag,
        }
    }

    /// Combine commands, flattening nested batches and dropping no-ops.
    pub fn batch(cmds: impl IntoIterator<Item = Cmd>) -> Self {
        let mut flat = Vec::new();
        for cmd in cmds {
            match cmd {
                Self::None => {}
                Self::Batch(inner) => match Self::batch(inner) {
                    Self::Batch(children) => flat.extend(children),
                    Self::None => {}
                    single => flat.push(single),
                },
                other => flat.push(other),
            }
        }
        match flat.len() {
            0 => Self::None,
            1 => flat.pop().unwrap_or(Self::None),
            _ => Self::Batch(flat),
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    pub fn is_quit(&self) -> bool {
        matches!(self, Self::Quit)
    }

    /// True if this command or any batched child quits.
    pub fn contains_quit(&self) -> bool {
        match self {
            Self::Quit => true,
            Self::Batch(cmds) => cmds.iter().any(Self::contains_quit),
            _ => false,
        }
    }

    /// Number of tasks that will each produce a message.
    pub fn perform_count(&self) -> usize {
        match self {
            Self::Perform(_) => 1,
            Self::Batch(cmds) => cmds.iter().map(Self::perform_count).sum(),
            _ => 0,
        }
    }

    pub fn tick_tags(&self) -> Vec<u64> {
        match self {
            Self::Tick { tag, .. } => vec![*tag],
            Self::Batch(cmds) => cmds.iter().flat_map(Self::tick_tags).collect(),
            _ => Vec::new(),
        }
    }

    /// Run every task synchronously, in batch order, and collect the messages.
    /// Ticks and quits are skipped. Used by tests and by non-interactive callers.
    pub fn run_inline(self) -> Vec<Msg> {
        match self {
            Self::Perform(task) => vec![task()],
            Self::Batch(cmds) => cmds.into_iter().flat_map(Self::run_inline).collect(),
            Self::None | Self::Quit | Self::Tick { .. } => Vec::new(),
        }
    }
}

impl fmt::Debug for Cmd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::Quit => f.write_str("Quit"),
            Self::Perform(_) => f.write_str("Perform(..)"),
            Self::Tick { delay, tag } => f
                .debug_struct("Tick")
                .field("delay", delay)
                .field("tag", tag)
                .finish(),
            Self::Batch(cmds) => f.debug_tuple("Batch").field(cmds).finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_of_nothing_is_none() {
        assert!(Cmd::batch([Cmd::none(), Cmd::none()]).is_none());
        assert!(Cmd::batch(Vec::new()).is_none());
    }

    #[test]
    fn test_batch_unwraps_single_child() {
        let cmd = Cmd::batch([Cmd::none(), Cmd::quit()]);
        assert!(cmd.is_quit());
    }

    #[test]
    fn test_batch_flattens_nested() {
        let inner = Cmd::Batch(vec![Cmd::tick(1), Cmd::None, Cmd::message(Msg::Back)]);
        let cmd = Cmd::batch([inner, Cmd::tick(2)]);
        match &cmd {
            Cmd::Batch(children) => assert_eq!(children.len(), 3),
            other => panic!("expected batch, got {other:?}"),
        }
        assert_eq!(cmd.tick_tags(), vec![1, 2]);
        assert_eq!(cmd.perform_count(), 1);
    }

    #[test]
    fn test_contains_quit_looks_inside_batches() {
        let cmd = Cmd::batch([Cmd::tick(0), Cmd::quit()]);
        assert!(cmd.contains_quit());
        assert!(!cmd.is_quit());
        assert!(!Cmd::tick(0).contains_quit());
    }

    #[test]
    fn test_run_inline_yields_one_message_per_task() {
        let cmd = Cmd::batch([
            Cmd::message(Msg::Back),
            Cmd::tick(3),
            Cmd::message(Msg::ToolSelected("x".into())),
        ]);
        let msgs = cmd.run_inline();
        assert_eq!(msgs.len(), 2);
        assert!(matches!(msgs[0], Msg::Back));
        assert!(matches!(&msgs[1], Msg::ToolSelected(id) if id == "x"));
    }

    #[test]
    fn test_tick_uses_default_interval() {
        match Cmd::tick(7) {
            Cmd::Tick { delay, tag } => {
                assert_eq!(delay, TICK_INTERVAL);
                assert_eq!(tag, 7);
            }
            other => panic!("expected tick, got {other:?}"),
        }
    }
}
