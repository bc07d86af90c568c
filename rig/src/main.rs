mod logging;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rig_core::{
    config::{self, Config},
    git::{CliGitProvider, GitProvider},
    runner::all_runners,
    update::{GithubReleases, ReleaseSource},
    version::{self, VERSION},
};
use rig_tui::{
    Home, Model, Registry, RegistryBuilder, Shell, Standalone, Theme,
    tools::{self, GIT_BRANCH, TEST_CHANGED, ToolContext},
};
use std::{path::PathBuf, process::ExitCode, sync::Arc};

#[derive(Parser)]
#[command(version = VERSION, about = "A toolbox of small terminal tools for git and tests")]
struct Cli {
    /// Override path to config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log file verbosity: off, error, warn, info, debug or trace
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<log::LevelFilter>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Commands {
    /// Switch, create, rename and delete git branches
    #[command(alias = "gb")]
    GitBranch,
    /// Run the tests affected by changes since the merge base
    #[command(alias = "tc")]
    TestChanged,
    /// Install the latest release if it is newer than this build
    Update,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = match config::load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(error) => {
            eprintln!("error: {error:#}");
            return ExitCode::from(2);
        }
    };

    let env_level = std::env::var(logging::LOG_ENV).ok();
    let level = logging::resolve_level(cli.log_level, env_level.as_deref());
    if let Err(error) = logging::setup_logging(level) {
        eprintln!("warning: logging disabled: {error:#}");
    }
    log::info!("rig {VERSION} starting");

    let result = match cli.command {
        None => run_shell(&config),
        Some(Commands::GitBranch) => run_standalone(&config, GIT_BRANCH),
        Some(Commands::TestChanged) => run_standalone(&config, TEST_CHANGED),
        Some(Commands::Update) => run_update(&config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            log::error!("{error:#}");
            eprintln!("error: {error:#}");
            ExitCode::from(1)
        }
    }
}

fn build_registry(config: &Config) -> Result<Arc<Registry>> {
    let git: Arc<dyn GitProvider> = Arc::new(CliGitProvider);
    let ctx = ToolContext {
        git,
        workdir: std::env::current_dir().context("reading the current directory")?,
        test_changed: config.test_changed.clone(),
        runners: Arc::new(all_runners()),
    };
    tools::register_builtin(RegistryBuilder::new(), &ctx).build()
}

fn run_shell(config: &Config) -> Result<()> {
    let registry = build_registry(config)?;
    let releases: Option<Arc<dyn ReleaseSource>> =
        if config.update.check_on_startup && !version::is_dev(VERSION) {
            Some(Arc::new(GithubReleases::new(&config.update.repository)))
        } else {
            None
        };

    let home_registry = Arc::clone(&registry);
    let mut shell = Shell::new(registry, move || {
        Box::new(Home::new(Arc::clone(&home_registry), releases.clone()))
    });
    run_tui(&mut shell, config)
}

fn run_standalone(config: &Config, id: &str) -> Result<()> {
    let registry = build_registry(config)?;
    let tool = registry
        .instantiate(id)
        .with_context(|| format!("no tool named {id}"))?;
    run_tui(&mut Standalone::new(tool), config)
}

fn run_tui(root: &mut dyn Model, config: &Config) -> Result<()> {
    let theme = Theme::from_config(&config.theme);
    let mut terminal = ratatui::init();
    let result = rig_tui::run(&mut terminal, root, &theme);
    ratatui::restore();
    result
}

fn run_update(config: &Config) -> Result<()> {
    if version::is_dev(VERSION) {
        println!("rig {VERSION} is a development build, skipping update");
        return Ok(());
    }
    let releases = GithubReleases::new(&config.update.repository);
    match releases.check()? {
        None => println!("rig {VERSION} is up to date"),
        Some(tag) => {
            println!("Updating rig {VERSION} -> {tag}...");
            releases.install(&tag)?;
            println!("Updated! Restart rig to use {tag}");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn aliases_resolve_to_tools() {
        let cli = Cli::try_parse_from(["rig", "gb"]).unwrap();
        assert_eq!(cli.command, Some(Commands::GitBranch));
        let cli = Cli::try_parse_from(["rig", "tc"]).unwrap();
        assert_eq!(cli.command, Some(Commands::TestChanged));
        let cli = Cli::try_parse_from(["rig", "test-changed"]).unwrap();
        assert_eq!(cli.command, Some(Commands::TestChanged));
    }

    #[test]
    fn global_options_parse() {
        let cli =
            Cli::try_parse_from(["rig", "-c", "/tmp/rig.toml", "--log-level", "debug"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/rig.toml")));
        assert_eq!(cli.log_level, Some(log::LevelFilter::Debug));
        assert_eq!(cli.command, None);
    }

    #[test]
    fn bad_log_level_rejected() {
        assert!(Cli::try_parse_from(["rig", "--log-level", "loud"]).is_err());
    }

    #[test]
    fn registry_has_builtin_tools() {
        let registry = build_registry(&Config::default()).unwrap();
        assert!(registry.get(GIT_BRANCH).is_some());
        assert!(registry.get(TEST_CHANGED).is_some());
    }
}
