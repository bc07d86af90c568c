pub mod command;
pub mod config;
pub mod git;
pub mod message;
pub mod runner;
pub mod state;
pub mod update;
pub mod version;

// Re-export commonly used types at crate root
pub use command::Cmd;
pub use config::Config;
pub use git::{Branch, GitProvider};
pub use message::{BranchMsg, HomeMsg, Msg, TestMsg};
pub use runner::TestRunner;
