//! Release checks and self-update.
//!
//! The home screen asks GitHub for the latest release tag and, when the user
//! accepts, downloads the archive for this platform and swaps it in for the
//! running executable.

use anyhow::{Context, Result, anyhow, bail};
use flate2::read::GzDecoder;
use serde::Deserialize;
use std::{
    ffi::OsStr,
    io::{Read, Write},
    path::Path,
    time::Duration,
};
use ureq::Agent;

pub use crate::version::is_newer;
use crate::version::VERSION;

/// Name of the executable inside release archives.
pub const BINARY_NAME: &str = "rig";

#[derive(Debug, Deserialize)]
struct Release {
    #[serde(default)]
    tag_name: String,
}

fn agent(timeout: Option<Duration>) -> Agent {
    let config = ureq::config::Config::builder()
        .timeout_global(timeout)
        .build();
    config.new_agent()
}

fn get(agent: &Agent, url: &str) -> Result<ureq::http::Response<ureq::Body>> {
    match agent
        .get(url)
        .header("User-Agent", format!("rig/{VERSION}"))
        .call()
    {
        Ok(response) => Ok(response),
        Err(ureq::Error::StatusCode(status)) => Err(anyhow!("{url} returned status {status}")),
        Err(err) => Err(anyhow!(err)).with_context(|| format!("request to {url} failed")),
    }
}

/// Tag of the latest published release of `repository` (`owner/name`).
pub fn latest_release(repository: &str) -> Result<String> {
    let url = format!("https://api.github.com/repos/{repository}/releases/latest");
    latest_release_impl(&url)
}

/// Internal implementation that allows injecting the URL for testing.
fn latest_release_impl(url: &str) -> Result<String> {
    let response = get(&agent(Some(Duration::from_secs(3))), url)?;
    let release: Release = response
        .into_body()
        .read_json()
        .context("failed to parse release metadata")?;
    if release.tag_name.is_empty() {
        bail!("release metadata has no tag_name");
    }
    Ok(release.tag_name)
}

/// Newer release tag if one exists. Development builds never look.
pub fn check_for_update(repository: &str) -> Result<Option<String>> {
    if crate::version::is_dev(VERSION) {
        return Ok(None);
    }
    let latest = latest_release(repository)?;
    Ok(is_newer(VERSION, &latest).then_some(latest))
}

/// Where the home screen looks for and installs releases.
pub trait ReleaseSource: Send + Sync {
    /// Newer release tag, if any.
    fn check(&self) -> Result<Option<String>>;
    /// Replace the running executable with release `tag`.
    fn install(&self, tag: &str) -> Result<()>;
}

/// Releases published on GitHub for `repository`.
pub struct GithubReleases {
    repository: String,
}

impl GithubReleases {
    pub fn new(repository: &str) -> Self {
        Self {
            repository: repository.to_string(),
        }
    }
}

impl ReleaseSource for GithubReleases {
    fn check(&self) -> Result<Option<String>> {
        check_for_update(&self.repository)
    }

    fn install(&self, tag: &str) -> Result<()> {
        download_and_replace(&self.repository, tag)
    }
}

/// Archive name for the platform this binary was built for.
pub fn asset_name() -> Result<String> {
    let os = match std::env::consts::OS {
        "linux" => "Linux",
        "macos" => "Darwin",
        other => bail!("unsupported operating system: {other}"),
    };
    let arch = match std::env::consts::ARCH {
        "x86_64" => "x86_64",
        "aarch64" => "arm64",
        other => bail!("unsupported architecture: {other}"),
    };
    Ok(format!("{BINARY_NAME}_{os}_{arch}.tar.gz"))
}

/// Download release `tag` and replace the running executable with it.
pub fn download_and_replace(repository: &str, tag: &str) -> Result<()> {
    let url = format!(
        "https://github.com/{repository}/releases/download/{tag}/{}",
        asset_name()?
    );
    let exe = std::env::current_exe().context("locating the running executable")?;
    let exe = exe.canonicalize().unwrap_or(exe);
    download_and_replace_impl(&url, &exe)
}

fn download_and_replace_impl(url: &str, exe: &Path) -> Result<()> {
    log::info!("downloading {url}");
    let response = get(&agent(None), url)?;
    let binary = extract_binary(response.into_body().into_reader(), BINARY_NAME)?;
    replace_executable(exe, &binary)?;
    log::info!("replaced {}", exe.display());
    Ok(())
}

/// Read a `.tar.gz` stream and return the contents of the first regular file
/// whose file name is `name`.
pub fn extract_binary<R: Read>(reader: R, name: &str) -> Result<Vec<u8>> {
    let mut archive = tar::Archive::new(GzDecoder::new(reader));
    for entry in archive.entries().context("reading release archive")? {
        let mut entry = entry.context("reading release archive entry")?;
        if !entry.header().entry_type().is_file() {
            continue;
        }
        let matches = entry
            .path()
            .is_ok_and(|p| p.file_name() == Some(OsStr::new(name)));
        if matches {
            let mut contents = Vec::new();
            entry
                .read_to_end(&mut contents)
                .with_context(|| format!("extracting {name}"))?;
            return Ok(contents);
        }
    }
    bail!("{name} not found in release archive")
}

/// Write `contents` next to `exe` and atomically move it into place.
fn replace_executable(exe: &Path, contents: &[u8]) -> Result<()> {
    let dir = exe
        .parent()
        .with_context(|| format!("{} has no parent directory", exe.display()))?;
    let mut tmp = tempfile::NamedTempFile::new_in(dir)
        .with_context(|| format!("creating temp file in {}", dir.display()))?;
    tmp.write_all(contents)?;
    tmp.flush()?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(tmp.path(), std::fs::Permissions::from_mode(0o755))?;
    }

    tmp.persist(exe)
        .with_context(|| format!("replacing {}", exe.display()))?;
    Ok(())
}
