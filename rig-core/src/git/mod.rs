pub mod cli;
pub mod mock;
pub mod provider;

pub use cli::CliGitProvider;
pub use provider::GitProvider;

use crate::message::{RemoteOutcome, RemoteRename, RenameOutcome};
use std::path::Path;

/// Format string for `git for-each-ref`: `name|upstream|head-marker`.
pub const BRANCH_FORMAT: &str = "--format=%(refname:short)|%(upstream:short)|%(HEAD)";

/// A local branch as reported by `git for-each-ref`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Branch {
    pub name: String,
    /// Upstream tracking ref, e.g. `origin/feature/foo`
    pub upstream: Option<String>,
    pub is_current: bool,
    pub has_remote: bool,
}

impl Branch {
    pub fn local(name: &str) -> Self {
        Self {
            name: name.to_string(),
            upstream: None,
            is_current: false,
            has_remote: false,
        }
    }

    #[must_use]
    pub fn tracking(mut self, upstream: &str) -> Self {
        self.upstream = Some(upstream.to_string());
        self.has_remote = true;
        self
    }

    #[must_use]
    pub fn current(mut self) -> Self {
        self.is_current = true;
        self
    }
}

/// Parse `git for-each-ref` output produced with [`BRANCH_FORMAT`].
/// Lines that do not have exactly three fields are skipped.
pub fn parse_branch_refs(output: &str) -> Vec<Branch> {
    output
        .lines()
        .filter_map(|line| {
            let fields: Vec<&str> = line.splitn(3, '|').collect();
            let [name, upstream, head] = fields.as_slice() else {
                return None;
            };
            if name.is_empty() {
                return None;
            }
            let upstream = (!upstream.is_empty()).then(|| (*upstream).to_string());
            Some(Branch {
                name: (*name).to_string(),
                has_remote: upstream.is_some(),
                upstream,
                is_current: head.trim() == "*",
            })
        })
        .collect()
}

/// Split an upstream ref into `(remote, branch)` at the first `/`.
/// Without a delimiter the input is returned for both parts.
pub fn split_upstream(upstream: &str) -> (&str, &str) {
    upstream.split_once('/').unwrap_or((upstream, upstream))
}

/// Rename `old` to `new` locally and, when `upstream` is given, on its remote.
///
/// The new remote ref is pushed before the old one is deleted so the work is
/// never without a remote copy. Each step's failure is reported in the outcome
/// rather than returned as an error.
pub fn rename_branch_everywhere(
    git: &dyn GitProvider,
    repo_path: &Path,
    old: &str,
    new: &str,
    upstream: Option<&str>,
) -> RenameOutcome {
    let mut outcome = RenameOutcome {
        old_name: old.to_string(),
        new_name: new.to_string(),
        local: git
            .rename_branch(repo_path, old, new)
            .map_err(|e| format!("{e:#}")),
        remote: None,
    };
    if outcome.local.is_err() {
        return outcome;
    }
    let Some(upstream) = upstream else {
        return outcome;
    };

    let (remote, old_remote_branch) = split_upstream(upstream);
    let status = if let Err(e) = git.push_branch(repo_path, remote, new) {
        log::warn!("push of renamed branch {new} to {remote} failed: {e:#}");
        RemoteRename::PushFailed(format!("{e:#}"))
    } else if let Err(e) = git.delete_remote_branch(repo_path, remote, old_remote_branch) {
        log::warn!("deleting {remote}/{old_remote_branch} failed: {e:#}");
        RemoteRename::DeleteOldFailed(format!("{e:#}"))
    } else {
        RemoteRename::Updated
    };
    outcome.remote = Some(RemoteOutcome {
        remote: remote.to_string(),
        status,
    });
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::mock::MockGitProvider;

    #[test]
    fn test_parse_branch_refs() {
        let output = "main|origin/main|*\nfeature/x||\nwip|origin/wip| \n";
        let branches = parse_branch_refs(output);
        assert_eq!(branches.len(), 3);
        assert_eq!(branches[0], Branch::local("main").tracking("origin/main").current());
        assert_eq!(branches[1], Branch::local("feature/x"));
        assert_eq!(branches[2], Branch::local("wip").tracking("origin/wip"));
    }

    #[test]
    fn test_parse_branch_refs_skips_malformed_lines() {
        let output = "garbage\nonly|two\n\nok||\n";
        let branches = parse_branch_refs(output);
        assert_eq!(branches, vec![Branch::local("ok")]);
    }

    #[test]
    fn test_parse_branch_refs_keeps_pipes_in_third_field() {
        let branches = parse_branch_refs("a|b|*|extra");
        assert_eq!(branches.len(), 1);
        assert!(!branches[0].is_current);
    }

    #[test]
    fn test_parse_branch_refs_empty() {
        assert!(parse_branch_refs("").is_empty());
    }

    #[test]
    fn test_split_upstream() {
        assert_eq!(split_upstream("origin/feature/foo"), ("origin", "feature/foo"));
        assert_eq!(split_upstream("origin/a/b/c"), ("origin", "a/b/c"));
        assert_eq!(split_upstream("nodelim"), ("nodelim", "nodelim"));
        assert_eq!(split_upstream(""), ("", ""));
    }

    #[test]
    fn test_rename_local_only() {
        let git = MockGitProvider::default();
        let outcome = rename_branch_everywhere(&git, Path::new("."), "a", "b", None);
        assert_eq!(outcome.local, Ok(()));
        assert!(outcome.remote.is_none());
        assert!(git.calls().iter().all(|c| !c.starts_with("push")));
    }

    #[test]
    fn test_rename_pushes_before_deleting() {
        let git = MockGitProvider::default();
        let outcome =
            rename_branch_everywhere(&git, Path::new("."), "old", "new", Some("origin/old"));
        assert_eq!(
            outcome.remote,
            Some(RemoteOutcome {
                remote: "origin".into(),
                status: RemoteRename::Updated,
            })
        );
        assert_eq!(
            git.calls(),
            vec![
                "rename old new".to_string(),
                "push origin new".to_string(),
                "delete-remote origin old".to_string(),
            ]
        );
    }

    #[test]
    fn test_rename_push_failure_keeps_old_remote() {
        let git = MockGitProvider::default();
        git.fail_next_push("push new branch: rejected");
        let outcome =
            rename_branch_everywhere(&git, Path::new("."), "old", "new", Some("origin/old"));
        assert!(outcome.is_partial());
        assert!(matches!(
            outcome.remote.map(|r| r.status),
            Some(RemoteRename::PushFailed(e)) if e.contains("rejected")
        ));
        assert!(!git.calls().iter().any(|c| c.starts_with("delete-remote")));
    }

    #[test]
    fn test_rename_delete_failure_reported() {
        let git = MockGitProvider::default();
        git.fail_next_remote_delete("delete remote branch: gone");
        let outcome =
            rename_branch_everywhere(&git, Path::new("."), "old", "new", Some("upstream/x/old"));
        let remote = outcome.remote.clone().expect("remote outcome");
        assert_eq!(remote.remote, "upstream");
        assert!(matches!(remote.status, RemoteRename::DeleteOldFailed(_)));
        assert!(git.calls().contains(&"delete-remote upstream x/old".to_string()));
    }

    #[test]
    fn test_rename_local_failure_skips_remote() {
        let git = MockGitProvider::default();
        git.fail_next_rename("rename branch: exists");
        let outcome =
            rename_branch_everywhere(&git, Path::new("."), "old", "new", Some("origin/old"));
        assert!(outcome.local.is_err());
        assert!(outcome.remote.is_none());
        assert_eq!(git.calls(), vec!["rename old new".to_string()]);
    }
}
