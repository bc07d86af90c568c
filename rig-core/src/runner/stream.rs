use anyhow::{Context, Result};
use std::{
    fmt,
    io::{BufRead, BufReader, Read},
    process::{Child, Command, Stdio},
    sync::{
        Arc, Mutex,
        mpsc::{self, Receiver, RecvTimeoutError, Sender},
    },
    thread,
    time::Duration,
};

/// Most lines handed back by a single read.
const MAX_LINES_PER_CHUNK: usize = 64;
/// How often the waiter checks whether the child has exited.
const EXIT_POLL: Duration = Duration::from_millis(20);

enum RunEvent {
    Line(String),
    Exited(Result<bool, String>),
}

/// Kill switch for a spawned test process, shareable with its owner's UI state.
#[derive(Clone)]
pub struct RunHandle {
    child: Arc<Mutex<Child>>,
}

impl fmt::Debug for RunHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RunHandle")
    }
}

impl RunHandle {
    /// Kill the process if it is still running. Does not wait for it.
    pub fn kill(&self) {
        let Ok(mut child) = self.child.lock() else {
            return;
        };
        if let Ok(None) = child.try_wait() {
            match child.kill() {
                Ok(()) => log::info!("killed test process (pid {})", child.id()),
                Err(e) => log::warn!("failed to kill test process (pid {}): {e}", child.id()),
            }
        }
    }

    fn poll_exit(&self) -> Result<Option<bool>, String> {
        let mut child = self
            .child
            .lock()
            .map_err(|_| "test process lock poisoned".to_string())?;
        child
            .try_wait()
            .map(|status| status.map(|s| s.success()))
            .map_err(|e| e.to_string())
    }
}

/// Handle to the output of a running test process.
///
/// Owned by whichever command is currently reading from it and handed back
/// inside each [`RunChunk`] so the next read can continue where it stopped.
/// Dropping the stream before the process exits kills the process.
pub struct RunStream {
    rx: Receiver<RunEvent>,
    handle: RunHandle,
}

impl Drop for RunStream {
    fn drop(&mut self) {
        self.handle.kill();
    }
}

impl fmt::Debug for RunStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RunStream")
    }
}

#[derive(Debug)]
pub enum RunState {
    /// More output may follow
    Streaming(RunStream),
    /// Process finished. `Ok(true)` on a zero exit status.
    Exited(Result<bool, String>),
}

/// Lines read since the previous chunk, plus where the run stands.
#[derive(Debug)]
pub struct RunChunk {
    pub lines: Vec<String>,
    pub state: RunState,
}

impl RunChunk {
    pub fn failed(error: String) -> Self {
        Self {
            lines: Vec::new(),
            state: RunState::Exited(Err(error)),
        }
    }
}

fn forward_lines<R: Read + Send + 'static>(reader: R, tx: Sender<RunEvent>) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        for line in BufReader::new(reader).lines() {
            let Ok(line) = line else { break };
            if tx.send(RunEvent::Line(line)).is_err() {
                break;
            }
        }
    })
}

impl RunStream {
    /// Spawn `command` with stdout and stderr merged line by line.
    pub fn spawn(mut command: Command) -> Result<Self> {
        let program = command.get_program().to_string_lossy().into_owned();
        let mut child = command
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| format!("failed to start {program}"))?;
        log::info!("started {program} (pid {})", child.id());

        let (tx, rx) = mpsc::channel();
        let readers: Vec<_> = [
            child.stdout.take().map(|out| forward_lines(out, tx.clone())),
            child.stderr.take().map(|err| forward_lines(err, tx.clone())),
        ]
        .into_iter()
        .flatten()
        .collect();

        let handle = RunHandle {
            child: Arc::new(Mutex::new(child)),
        };
        let waiter = handle.clone();
        thread::spawn(move || {
            let status = loop {
                match waiter.poll_exit() {
                    Ok(Some(success)) => break Ok(success),
                    Ok(None) => thread::sleep(EXIT_POLL),
                    Err(e) => break Err(format!("waiting for {program}: {e}")),
                }
            };
            for reader in readers {
                let _ = reader.join();
            }
            let _ = tx.send(RunEvent::Exited(status));
        });

        Ok(Self { rx, handle })
    }

    pub fn handle(&self) -> RunHandle {
        self.handle.clone()
    }

    /// Wait up to `wait` for output, then take whatever else is ready.
    pub fn next_chunk(self, wait: Duration) -> RunChunk {
        let mut lines = Vec::new();
        let first = match self.rx.recv_timeout(wait) {
            Ok(event) => event,
            Err(RecvTimeoutError::Timeout) => {
                return RunChunk {
                    lines,
                    state: RunState::Streaming(self),
                };
            }
            Err(RecvTimeoutError::Disconnected) => {
                return RunChunk::failed("test process output closed unexpectedly".to_string());
            }
        };

        let mut next = Some(first);
        while let Some(event) = next.take() {
            match event {
                RunEvent::Line(line) => lines.push(line),
                RunEvent::Exited(result) => {
                    return RunChunk {
                        lines,
                        state: RunState::Exited(result),
                    };
                }
            }
            if lines.len() < MAX_LINES_PER_CHUNK {
                next = self.rx.try_recv().ok();
            }
        }

        RunChunk {
            lines,
            state: RunState::Streaming(self),
        }
    }
}
