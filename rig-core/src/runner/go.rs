use super::TestRunner;
use std::{collections::BTreeSet, path::Path, process::Command};

/// Runs `go test` for the packages containing changed `.go` files.
pub struct GoRunner;

impl TestRunner for GoRunner {
    fn name(&self) -> &'static str {
        "go"
    }

    fn detect(&self, root: &Path) -> bool {
        root.join("go.mod").is_file()
    }

    fn find_targets(&self, _root: &Path, files: &[String]) -> Vec<String> {
        let targets: BTreeSet<String> = files
            .iter()
            .filter(|f| Path::new(f).extension().is_some_and(|ext| ext == "go"))
            .map(|f| match Path::new(f).parent() {
                Some(dir) if !dir.as_os_str().is_empty() => {
                    format!("./{}/...", dir.to_string_lossy())
                }
                _ => "./...".to_string(),
            })
            .collect();
        targets.into_iter().collect()
    }

    fn command(&self, root: &Path, targets: &[String]) -> Command {
        let mut cmd = Command::new("go");
        cmd.args(["test", "-v"]).args(targets).current_dir(root);
        cmd
    }
}
