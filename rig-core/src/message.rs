use crate::{
    git::Branch,
    runner::{Discovery, RunChunk},
};
use crossterm::event::KeyEvent;

/// Everything a screen can react to.
/// Terminal input, timer ticks and the results of background commands all
/// arrive through this one type and are consumed exactly once by `update`.
#[derive(Debug)]
pub enum Msg {
    /// A key press from the terminal
    Key(KeyEvent),

    /// The terminal was resized
    Resize { width: u16, height: u16 },

    /// Animation tick, carrying the generation it was issued for
    Tick { tag: u64 },

    /// Leave the active tool
    Back,

    /// A tool was picked on the home screen
    ToolSelected(String),

    Home(HomeMsg),
    GitBranch(BranchMsg),
    TestChanged(TestMsg),
}

#[derive(Debug)]
pub enum HomeMsg {
    /// Release check finished. `Ok(Some(tag))` when a newer release exists.
    UpdateChecked(Result<Option<String>, String>),
    /// Download and replace of the running binary finished
    UpdateFinished(Result<(), String>),
}

#[derive(Debug)]
pub enum BranchMsg {
    Loaded(Result<Vec<Branch>, String>),
    CheckedOut {
        name: String,
        result: Result<(), String>,
    },
    Created {
        name: String,
        result: Result<(), String>,
    },
    Deleted {
        name: String,
        result: Result<(), String>,
    },
    Renamed(RenameOutcome),
}

/// Result of renaming a branch locally and, optionally, on its remote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameOutcome {
    pub old_name: String,
    pub new_name: String,
    pub local: Result<(), String>,
    /// `None` when only the local branch was renamed
    pub remote: Option<RemoteOutcome>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteOutcome {
    pub remote: String,
    pub status: RemoteRename,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteRename {
    /// New ref pushed and old ref deleted
    Updated,
    /// Pushing the new name failed. The old remote ref is untouched.
    PushFailed(String),
    /// The new name was pushed but the old ref could not be deleted
    DeleteOldFailed(String),
}

impl RenameOutcome {
    /// Local rename worked but the remote side did not fully follow.
    pub fn is_partial(&self) -> bool {
        self.local.is_ok()
            && self
                .remote
                .as_ref()
                .is_some_and(|r| r.status != RemoteRename::Updated)
    }
}

#[derive(Debug)]
pub enum TestMsg {
    TargetsLoaded(Result<Discovery, String>),
    /// Next slice of output from a running test process
    Output(RunChunk),
}
