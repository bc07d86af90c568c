pub mod git_branch;
pub mod test_changed;

pub use git_branch::GitBranch;
pub use test_changed::TestChanged;

use crate::registry::{RegistryBuilder, ToolDescriptor};
use rig_core::{GitProvider, TestRunner, config::TestChangedConfig};
use std::{path::PathBuf, sync::Arc};

pub const GIT_BRANCH: &str = "git-branch";
pub const TEST_CHANGED: &str = "test-changed";

/// Collaborators shared by every tool instance.
#[derive(Clone)]
pub struct ToolContext {
    pub git: Arc<dyn GitProvider>,
    /// Repository the tools operate on
    pub workdir: PathBuf,
    pub test_changed: TestChangedConfig,
    pub runners: Arc<Vec<Box<dyn TestRunner>>>,
}

impl ToolContext {
    pub fn git_branch(&self) -> GitBranch {
        GitBranch::new(Arc::clone(&self.git), self.workdir.clone())
    }

    pub fn test_changed(&self) -> TestChanged {
        TestChanged::new(
            Arc::clone(&self.git),
            Arc::clone(&self.runners),
            self.workdir.clone(),
            &self.test_changed,
        )
    }
}

/// Register the tools that ship with rig, in menu order.
pub fn register_builtin(builder: RegistryBuilder, ctx: &ToolContext) -> RegistryBuilder {
    let branch_ctx = ctx.clone();
    let test_ctx = ctx.clone();
    builder
        .register(ToolDescriptor::new(
            GIT_BRANCH,
            "Git Branch",
            "Rename git branches (local and remote)",
            move || Box::new(branch_ctx.git_branch()),
        ))
        .register(ToolDescriptor::new(
            TEST_CHANGED,
            "Test Changed",
            "Run tests for changed files vs merge base",
            move || Box::new(test_ctx.test_changed()),
        ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rig_core::{git::mock::MockGitProvider, runner::all_runners};

    #[test]
    fn test_builtin_tools_registered_in_order() {
        let ctx = ToolContext {
            git: Arc::new(MockGitProvider::default()),
            workdir: PathBuf::from("."),
            test_changed: TestChangedConfig::default(),
            runners: Arc::new(all_runners()),
        };
        let registry = register_builtin(RegistryBuilder::new(), &ctx).build().unwrap();
        let ids: Vec<&str> = registry.tools().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![GIT_BRANCH, TEST_CHANGED]);
        assert!(registry.instantiate(GIT_BRANCH).is_some());
        assert!(registry.instantiate(TEST_CHANGED).is_some());
    }
}
