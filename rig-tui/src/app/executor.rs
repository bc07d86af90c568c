use rig_core::{Cmd, Msg};
use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
        mpsc,
    },
    thread,
};

/// Handle for dispatching background work
#[derive(Clone)]
pub struct EventSender {
    tx: mpsc::Sender<Msg>,
    cancel: Arc<AtomicBool>,
}

impl EventSender {
    pub fn new() -> (Self, mpsc::Receiver<Msg>) {
        let (tx, rx) = mpsc::channel();
        let sender = Self {
            tx,
            cancel: Arc::new(AtomicBool::new(false)),
        };
        (sender, rx)
    }

    /// Send a message from a background thread to the main loop.
    /// Dropped once the loop has quit.
    pub fn send(&self, msg: Msg) {
        if self.is_cancelled() {
            return;
        }
        let _ = self.tx.send(msg);
    }

    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::Relaxed)
    }
}

/// Whether the loop should keep going after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Start `cmd`. Tasks and ticks run on their own threads and report back
/// through `sender`; this never blocks.
pub fn execute(cmd: Cmd, sender: &EventSender) -> Flow {
    match cmd {
        Cmd::None => Flow::Continue,
        Cmd::Quit => {
            log::debug!("quit requested");
            sender.cancel();
            Flow::Quit
        }
        Cmd::Perform(task) => {
            let sender = sender.clone();
            thread::spawn(move || {
                if sender.is_cancelled() {
                    return;
                }
                let msg = task();
                sender.send(msg);
            });
            Flow::Continue
        }
        Cmd::Tick { delay, tag } => {
            let sender = sender.clone();
            thread::spawn(move || {
                thread::sleep(delay);
                sender.send(Msg::Tick { tag });
            });
            Flow::Continue
        }
        Cmd::Batch(cmds) => {
            let mut flow = Flow::Continue;
            for cmd in cmds {
                if execute(cmd, sender) == Flow::Quit {
                    flow = Flow::Quit;
                }
            }
            flow
        }
    }
}
