use super::Branch;
use anyhow::Result;
use std::path::Path;

pub trait GitProvider: Send + Sync {
    fn list_branches(&self, repo_path: &Path) -> Result<Vec<Branch>>;
    fn switch_branch(&self, repo_path: &Path, name: &str) -> Result<()>;
    fn create_branch(&self, repo_path: &Path, name: &str) -> Result<()>;
    fn delete_branch(&self, repo_path: &Path, name: &str) -> Result<()>;
    fn rename_branch(&self, repo_path: &Path, old: &str, new: &str) -> Result<()>;
    fn push_branch(&self, repo_path: &Path, remote: &str, branch: &str) -> Result<()>;
    fn delete_remote_branch(&self, repo_path: &Path, remote: &str, branch: &str) -> Result<()>;

    /// First of `candidates` that exists as `origin/<candidate>`.
    fn default_branch(&self, repo_path: &Path, candidates: &[String]) -> Result<String>;
    fn merge_base(&self, repo_path: &Path, reference: &str) -> Result<String>;

    /// Files changed since `base`, including unstaged and staged work.
    fn changed_files(&self, repo_path: &Path, base: &str) -> Result<Vec<String>>;
}
