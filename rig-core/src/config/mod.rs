use anyhow::{Context, Result};
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

pub const APP_NAME: &str = "rig";

pub fn config_dir() -> Option<PathBuf> {
    // Use ~/.config on both Linux and macOS (not ~/Library/Application Support)
    if let Ok(xdg_config_home) = std::env::var("XDG_CONFIG_HOME")
        && !xdg_config_home.is_empty()
    {
        return Some(PathBuf::from(xdg_config_home).join(APP_NAME));
    }
    dirs::home_dir().map(|home| home.join(".config").join(APP_NAME))
}

pub fn config_file() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.toml"))
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Color theme configuration.
    #[serde(default)]
    pub theme: ThemeConfig,

    /// Release checks and self-update.
    #[serde(default)]
    pub update: UpdateConfig,

    /// Settings for the `test-changed` tool.
    #[serde(default)]
    pub test_changed: TestChangedConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct UpdateConfig {
    /// Look for a newer release when the home screen opens (default: true).
    #[serde(default = "UpdateConfig::default_check_on_startup")]
    pub check_on_startup: bool,
    /// GitHub `owner/name` that publishes releases.
    #[serde(default = "UpdateConfig::default_repository")]
    pub repository: String,
}

impl Default for UpdateConfig {
    fn default() -> Self {
        Self {
            check_on_startup: Self::default_check_on_startup(),
            repository: Self::default_repository(),
        }
    }
}

impl UpdateConfig {
    fn default_check_on_startup() -> bool {
        true
    }
    fn default_repository() -> String {
        "ryan-rushton/rig".to_string()
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct TestChangedConfig {
    /// Branches probed on `origin`, in order, to find the merge base.
    /// ```toml
    /// [test_changed]
    /// default_branches = ["main", "master", "develop"]
    /// ```
    #[serde(default = "TestChangedConfig::default_branches")]
    pub default_branches: Vec<String>,
    /// Test output lines kept in memory (default: 500).
    #[serde(default = "TestChangedConfig::default_max_output_lines")]
    pub max_output_lines: usize,
}

impl Default for TestChangedConfig {
    fn default() -> Self {
        Self {
            default_branches: Self::default_branches(),
            max_output_lines: Self::default_max_output_lines(),
        }
    }
}

impl TestChangedConfig {
    fn default_branches() -> Vec<String> {
        vec!["main".to_string(), "master".to_string()]
    }
    fn default_max_output_lines() -> usize {
        500
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct ThemeConfig {
    /// Selection and key hints (default: "#ff2e97").
    #[serde(
        default = "ThemeConfig::default_accent",
        deserialize_with = "deserialize_color"
    )]
    pub accent: ThemeColor,
    /// Screen titles (default: "#00f0ff").
    #[serde(
        default = "ThemeConfig::default_title",
        deserialize_with = "deserialize_color"
    )]
    pub title: ThemeColor,
    /// Success/positive color (default: "#39ff14").
    #[serde(
        default = "ThemeConfig::default_success",
        deserialize_with = "deserialize_color"
    )]
    pub success: ThemeColor,
    /// Error color (default: "#ff3131").
    #[serde(
        default = "ThemeConfig::default_error",
        deserialize_with = "deserialize_color"
    )]
    pub error: ThemeColor,
    /// Descriptions, upstream refs and help text (default: "#8a8f98").
    #[serde(
        default = "ThemeConfig::default_muted",
        deserialize_with = "deserialize_color"
    )]
    pub muted: ThemeColor,
    /// Borders and separators (default: "#3d4250").
    #[serde(
        default = "ThemeConfig::default_border",
        deserialize_with = "deserialize_color"
    )]
    pub border: ThemeColor,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            accent: Self::default_accent(),
            title: Self::default_title(),
            success: Self::default_success(),
            error: Self::default_error(),
            muted: Self::default_muted(),
            border: Self::default_border(),
        }
    }
}

impl ThemeConfig {
    fn default_accent() -> ThemeColor {
        ThemeColor::Rgb(0xff, 0x2e, 0x97)
    }
    fn default_title() -> ThemeColor {
        ThemeColor::Rgb(0x00, 0xf0, 0xff)
    }
    fn default_success() -> ThemeColor {
        ThemeColor::Rgb(0x39, 0xff, 0x14)
    }
    fn default_error() -> ThemeColor {
        ThemeColor::Rgb(0xff, 0x31, 0x31)
    }
    fn default_muted() -> ThemeColor {
        ThemeColor::Rgb(0x8a, 0x8f, 0x98)
    }
    fn default_border() -> ThemeColor {
        ThemeColor::Rgb(0x3d, 0x42, 0x50)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThemeColor {
    Named(NamedColor),
    Rgb(u8, u8, u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamedColor {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    Gray,
    DarkGray,
}

impl NamedColor {
    /// All named colours in alphabetical order, as accepted by the config parser.
    pub const fn all() -> &'static [(&'static str, NamedColor)] {
        &[
            ("black", NamedColor::Black),
            ("blue", NamedColor::Blue),
            ("cyan", NamedColor::Cyan),
            ("darkgray", NamedColor::DarkGray),
            ("gray", NamedColor::Gray),
            ("green", NamedColor::Green),
            ("magenta", NamedColor::Magenta),
            ("red", NamedColor::Red),
            ("white", NamedColor::White),
            ("yellow", NamedColor::Yellow),
        ]
    }
}

impl ThemeColor {
    pub fn parse(s: &str) -> Option<Self> {
        if let Some(hex) = s.strip_prefix('#')
            && hex.len() == 6
            && hex.is_ascii()
        {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            return Some(Self::Rgb(r, g, b));
        }
        let lower = s.to_lowercase();
        let lookup = match lower.as_str() {
            "grey" => "gray",
            "darkgrey" | "dark_gray" | "dark_grey" => "darkgray",
            other => other,
        };
        NamedColor::all()
            .iter()
            .find(|(name, _)| *name == lookup)
            .map(|(_, color)| Self::Named(*color))
    }
}

fn deserialize_color<'de, D>(deserializer: D) -> Result<ThemeColor, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    ThemeColor::parse(&s).ok_or_else(|| {
        serde::de::Error::custom(format!(
            "invalid color '{s}': expected a named color (black, red, green, yellow, blue, magenta, cyan, white, gray/grey, darkgray) or hex (#rrggbb)"
        ))
    })
}

pub fn load_config_from_str(s: &str) -> Result<Config> {
    let config: Config = toml::from_str(s)?;
    Ok(config)
}

/// Load the config file. Without an override a missing default file yields
/// the built-in defaults; an explicit path must exist.
pub fn load_config(config_override: Option<&Path>) -> Result<Config> {
    let config_file = match config_override {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("Config file not found at {}", path.display());
            }
            path.to_path_buf()
        }
        None => match config_file() {
            Some(path) if path.exists() => path,
            _ => return Ok(Config::default()),
        },
    };
    let contents = fs::read_to_string(&config_file)
        .with_context(|| format!("reading {}", config_file.display()))?;
    load_config_from_str(&contents).with_context(|| format!("parsing {}", config_file.display()))
}
