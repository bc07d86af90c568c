use super::{BRANCH_FORMAT, Branch, parse_branch_refs, provider::GitProvider};
use anyhow::{Context, Result, bail};
use std::{path::Path, process::Command};

pub struct CliGitProvider;

impl CliGitProvider {
    /// Run git in `repo_path`. A non-zero exit becomes `<label>: <stderr>`.
    fn run(repo_path: &Path, args: &[&str], label: &str) -> Result<String> {
        log::debug!("git {}", args.join(" "));
        let output = Command::new("git")
            .args(args)
            .current_dir(repo_path)
            .output()
            .with_context(|| format!("{label}: failed to run git"))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!("{label}: {}", stderr.trim());
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn name_only(repo_path: &Path, extra: &[&str]) -> Result<Vec<String>> {
        let mut args = vec!["diff", "--name-only"];
        args.extend_from_slice(extra);
        let stdout = Self::run(repo_path, &args, "changed files")?;
        Ok(stdout
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(String::from)
            .collect())
    }
}

impl GitProvider for CliGitProvider {
    fn list_branches(&self, repo_path: &Path) -> Result<Vec<Branch>> {
        match Self::run(
            repo_path,
            &["for-each-ref", BRANCH_FORMAT, "refs/heads/"],
            "list branches",
        ) {
            Ok(stdout) => Ok(parse_branch_refs(&stdout)),
            Err(e) => {
                log::warn!("listing branches failed: {e:#}");
                bail!("not a git repository or git not found")
            }
        }
    }

    fn switch_branch(&self, repo_path: &Path, name: &str) -> Result<()> {
        Self::run(repo_path, &["switch", name], "switch branch")?;
        Ok(())
    }

    fn create_branch(&self, repo_path: &Path, name: &str) -> Result<()> {
        Self::run(repo_path, &["branch", name], "create branch")?;
        Ok(())
    }

    fn delete_branch(&self, repo_path: &Path, name: &str) -> Result<()> {
        Self::run(repo_path, &["branch", "-D", name], "delete branch")?;
        Ok(())
    }

    fn rename_branch(&self, repo_path: &Path, old: &str, new: &str) -> Result<()> {
        Self::run(repo_path, &["branch", "-m", old, new], "rename branch")?;
        Ok(())
    }

    fn push_branch(&self, repo_path: &Path, remote: &str, branch: &str) -> Result<()> {
        Self::run(
            repo_path,
            &["push", "--set-upstream", remote, branch],
            "push new branch",
        )?;
        Ok(())
    }

    fn delete_remote_branch(&self, repo_path: &Path, remote: &str, branch: &str) -> Result<()> {
        Self::run(
            repo_path,
            &["push", remote, "--delete", branch],
            "delete remote branch",
        )?;
        Ok(())
    }

    fn default_branch(&self, repo_path: &Path, candidates: &[String]) -> Result<String> {
        for candidate in candidates {
            let reference = format!("origin/{candidate}");
            if Self::run(repo_path, &["rev-parse", "--verify", &reference], "default branch").is_ok()
            {
                return Ok(candidate.clone());
            }
        }
        let tried: Vec<String> = candidates.iter().map(|c| format!("origin/{c}")).collect();
        bail!("no default branch found (tried {})", tried.join(", "))
    }

    fn merge_base(&self, repo_path: &Path, reference: &str) -> Result<String> {
        let stdout = Self::run(repo_path, &["merge-base", "HEAD", reference], "merge base")?;
        Ok(stdout.trim().to_string())
    }

    fn changed_files(&self, repo_path: &Path, base: &str) -> Result<Vec<String>> {
        let mut files: Vec<String> = Vec::new();
        for extra in [&[base][..], &[][..], &["--cached"][..]] {
            for file in Self::name_only(repo_path, extra)? {
                if !files.contains(&file) {
                    files.push(file);
                }
            }
        }
        Ok(files)
    }
}
