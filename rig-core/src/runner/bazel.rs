use super::TestRunner;
use std::{path::Path, process::Command};

const MARKERS: &[&str] = &["BUILD.bazel", "WORKSPACE", "WORKSPACE.bazel", "MODULE.bazel"];

/// Runs the `*_test` targets that depend on the changed files.
pub struct BazelRunner;

/// `bazel query` expression selecting test targets that depend on `files`.
pub fn affected_tests_query(files: &[String]) -> String {
    format!("kind('.*_test', rdeps(//..., set({})))", files.join(" "))
}

/// Parse `--output=label` query output into sorted labels.
pub fn parse_labels(output: &str) -> Vec<String> {
    let mut labels: Vec<String> = output
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(String::from)
        .collect();
    labels.sort();
    labels
}

impl TestRunner for BazelRunner {
    fn name(&self) -> &'static str {
        "bazel"
    }

    fn detect(&self, root: &Path) -> bool {
        MARKERS.iter().any(|m| root.join(m).exists())
    }

    fn find_targets(&self, root: &Path, files: &[String]) -> Vec<String> {
        if files.is_empty() {
            return Vec::new();
        }
        let output = Command::new("bazel")
            .args(["query", &affected_tests_query(files), "--output=label"])
            .current_dir(root)
            .output();
        match output {
            Ok(out) if out.status.success() => parse_labels(&String::from_utf8_lossy(&out.stdout)),
            Ok(out) => {
                log::warn!(
                    "bazel query failed: {}",
                    String::from_utf8_lossy(&out.stderr).trim()
                );
                Vec::new()
            }
            Err(e) => {
                log::warn!("failed to run bazel: {e}");
                Vec::new()
            }
        }
    }

    fn command(&self, root: &Path, targets: &[String]) -> Command {
        let mut cmd = Command::new("bazel");
        cmd.arg("test").args(targets).current_dir(root);
        cmd
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_expression() {
        let q = affected_tests_query(&["a/BUILD".into(), "a/x.py".into()]);
        assert_eq!(q, "kind('.*_test', rdeps(//..., set(a/BUILD a/x.py)))");
    }

    #[test]
    fn test_parse_labels_sorted_and_trimmed() {
        let labels = parse_labels("//b:test\n\n  //a:test  \n");
        assert_eq!(labels, vec!["//a:test".to_string(), "//b:test".to_string()]);
    }

    #[test]
    fn test_detect_markers() {
        for marker in MARKERS {
            let tmp = tempfile::tempdir().unwrap();
            assert!(!BazelRunner.detect(tmp.path()));
            std::fs::write(tmp.path().join(marker), "").unwrap();
            assert!(BazelRunner.detect(tmp.path()), "{marker} should be detected");
        }
    }

    #[test]
    fn test_no_files_no_query() {
        assert!(BazelRunner.find_targets(Path::new("."), &[]).is_empty());
    }

    #[test]
    fn test_command() {
        let cmd = BazelRunner.command(Path::new("/ws"), &["//a:test".into()]);
        assert_eq!(cmd.get_program(), "bazel");
        let args: Vec<_> = cmd.get_args().collect();
        assert_eq!(args, ["test", "//a:test"]);
    }
}
