pub mod bazel;
pub mod go;
pub mod stream;

pub use bazel::BazelRunner;
pub use go::GoRunner;
pub use stream::{RunChunk, RunHandle, RunState, RunStream};

use crate::git::GitProvider;
use anyhow::{Context, Result};
use std::{
    path::{Path, PathBuf},
    process::Command,
};

/// A build system that can map changed files to test targets and run them.
pub trait TestRunner: Send + Sync {
    fn name(&self) -> &'static str;

    /// Whether this runner applies to the project at `root`.
    fn detect(&self, root: &Path) -> bool;

    /// Test targets affected by `files`, deduplicated and sorted.
    fn find_targets(&self, root: &Path, files: &[String]) -> Vec<String>;

    /// The command that runs `targets`.
    fn command(&self, root: &Path, targets: &[String]) -> Command;
}

/// Every known runner, in detection order.
pub fn all_runners() -> Vec<Box<dyn TestRunner>> {
    vec![Box::new(GoRunner), Box::new(BazelRunner)]
}

/// What `discover` found for the working tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Discovery {
    pub root: PathBuf,
    pub default_branch: String,
    pub changed_files: Vec<String>,
    /// Name of the runner that produced `targets`
    pub runner: Option<String>,
    pub targets: Vec<String>,
}

/// Find the test targets affected by changes since the merge base with the
/// default branch.
pub fn discover(
    git: &dyn GitProvider,
    runners: &[Box<dyn TestRunner>],
    root: &Path,
    candidates: &[String],
) -> Result<Discovery> {
    let default_branch = git
        .default_branch(root, candidates)
        .context("detect default branch")?;
    let base = git
        .merge_base(root, &format!("origin/{default_branch}"))
        .context("merge base")?;
    let changed_files = git.changed_files(root, &base).context("changed files")?;
    log::debug!(
        "{} changed files since {base} ({default_branch})",
        changed_files.len()
    );

    let mut discovery = Discovery {
        root: root.to_path_buf(),
        default_branch,
        changed_files,
        runner: None,
        targets: Vec::new(),
    };
    for runner in runners {
        if !runner.detect(root) {
            continue;
        }
        let targets = runner.find_targets(root, &discovery.changed_files);
        if !targets.is_empty() {
            discovery.runner = Some(runner.name().to_string());
            discovery.targets = targets;
            break;
        }
    }
    Ok(discovery)
}
