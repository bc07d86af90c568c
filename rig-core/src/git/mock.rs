use super::{Branch, provider::GitProvider};
use anyhow::{Result, anyhow};
use std::{
    path::Path,
    sync::{Mutex, MutexGuard, PoisonError},
};

/// Scripted git backend. Every call is recorded; failures are armed per
/// operation and consumed by the next matching call.
#[derive(Default)]
pub struct MockGitProvider {
    branches: Mutex<Vec<Branch>>,
    list_error: Mutex<Option<String>>,
    default_branch: Option<String>,
    changed: Vec<String>,
    switch_error: Mutex<Option<String>>,
    create_error: Mutex<Option<String>>,
    delete_error: Mutex<Option<String>>,
    rename_error: Mutex<Option<String>>,
    push_error: Mutex<Option<String>>,
    remote_delete_error: Mutex<Option<String>>,
    calls: Mutex<Vec<String>>,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

fn arm(slot: &Mutex<Option<String>>, error: &str) {
    *lock(slot) = Some(error.to_string());
}

fn take(slot: &Mutex<Option<String>>) -> Result<()> {
    match lock(slot).take() {
        Some(e) => Err(anyhow!(e)),
        None => Ok(()),
    }
}

impl MockGitProvider {
    pub fn with_branches(branches: Vec<Branch>) -> Self {
        Self {
            branches: Mutex::new(branches),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_default_branch(mut self, name: &str) -> Self {
        self.default_branch = Some(name.to_string());
        self
    }

    #[must_use]
    pub fn with_changed(mut self, files: &[&str]) -> Self {
        self.changed = files.iter().map(ToString::to_string).collect();
        self
    }

    pub fn calls(&self) -> Vec<String> {
        lock(&self.calls).clone()
    }

    pub fn set_branches(&self, branches: Vec<Branch>) {
        *lock(&self.branches) = branches;
    }

    pub fn fail_next_list(&self, error: &str) {
        arm(&self.list_error, error);
    }

    pub fn fail_next_switch(&self, error: &str) {
        arm(&self.switch_error, error);
    }

    pub fn fail_next_create(&self, error: &str) {
        arm(&self.create_error, error);
    }

    pub fn fail_next_delete(&self, error: &str) {
        arm(&self.delete_error, error);
    }

    pub fn fail_next_rename(&self, error: &str) {
        arm(&self.rename_error, error);
    }

    pub fn fail_next_push(&self, error: &str) {
        arm(&self.push_error, error);
    }

    pub fn fail_next_remote_delete(&self, error: &str) {
        arm(&self.remote_delete_error, error);
    }

    fn record(&self, call: String) {
        lock(&self.calls).push(call);
    }
}

impl GitProvider for MockGitProvider {
    fn list_branches(&self, _repo_path: &Path) -> Result<Vec<Branch>> {
        self.record("list".to_string());
        take(&self.list_error)?;
        Ok(lock(&self.branches).clone())
    }

    fn switch_branch(&self, _repo_path: &Path, name: &str) -> Result<()> {
        self.record(format!("switch {name}"));
        take(&self.switch_error)
    }

    fn create_branch(&self, _repo_path: &Path, name: &str) -> Result<()> {
        self.record(format!("create {name}"));
        take(&self.create_error)
    }

    fn delete_branch(&self, _repo_path: &Path, name: &str) -> Result<()> {
        self.record(format!("delete {name}"));
        take(&self.delete_error)
    }

    fn rename_branch(&self, _repo_path: &Path, old: &str, new: &str) -> Result<()> {
        self.record(format!("rename {old} {new}"));
        take(&self.rename_error)
    }

    fn push_branch(&self, _repo_path: &Path, remote: &str, branch: &str) -> Result<()> {
        self.record(format!("push {remote} {branch}"));
        take(&self.push_error)
    }

    fn delete_remote_branch(&self, _repo_path: &Path, remote: &str, branch: &str) -> Result<()> {
        self.record(format!("delete-remote {remote} {branch}"));
        take(&self.remote_delete_error)
    }

    fn default_branch(&self, _repo_path: &Path, _candidates: &[String]) -> Result<String> {
        self.default_branch
            .clone()
            .ok_or_else(|| anyhow!("no default branch found"))
    }

    fn merge_base(&self, _repo_path: &Path, reference: &str) -> Result<String> {
        Ok(format!("base-of-{reference}"))
    }

    fn changed_files(&self, _repo_path: &Path, _base: &str) -> Result<Vec<String>> {
        Ok(self.changed.clone())
    }
}
