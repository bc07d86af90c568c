use rig_core::config::APP_NAME;
use std::path::PathBuf;

const LOG_FILE_NAME: &str = "rig.log";

/// Environment variable that sets the log level when `--log-level` is absent.
pub const LOG_ENV: &str = "RIG_LOG";
pub const DEFAULT_LOG_LEVEL: log::LevelFilter = log::LevelFilter::Warn;

pub fn cache_dir() -> PathBuf {
    if let Ok(xdg_cache_home) = std::env::var("XDG_CACHE_HOME")
        && !xdg_cache_home.is_empty()
    {
        return PathBuf::from(xdg_cache_home).join(APP_NAME);
    }
    dirs::home_dir()
        .map_or_else(std::env::temp_dir, |home| home.join(".cache"))
        .join(APP_NAME)
}

pub fn default_log_file() -> PathBuf {
    cache_dir().join(LOG_FILE_NAME)
}

/// The flag wins over the environment; unparsable values fall back to the default.
pub fn resolve_level(flag: Option<log::LevelFilter>, env: Option<&str>) -> log::LevelFilter {
    flag.or_else(|| env.and_then(|v| v.trim().parse().ok()))
        .unwrap_or(DEFAULT_LOG_LEVEL)
}

pub fn setup_logging(level: log::LevelFilter) -> anyhow::Result<()> {
    let log_file = default_log_file();
    if let Some(parent) = log_file.parent() {
        std::fs::create_dir_all(parent)?;
    }
    simple_log::file(log_file.to_string_lossy().into_owned(), level, 10, 10)
        .map_err(|e| anyhow::anyhow!(e))?;
    log::info!("rig logging initialised (level={level})");
    Ok(())
}
