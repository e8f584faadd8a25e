//! Console configuration.
//!
//! Configuration is read from TOML and never written back:
//! - Linux: `~/.config/cfgdeploy/config.toml`
//! - Windows: `%APPDATA%/cfgdeploy/config.toml`

use std::path::{Path, PathBuf};

use anyhow::Context;
use cfgdeploy_protocol::CategorySet;
use cfgdeploy_steam::GameLayout;
use serde::Deserialize;

use crate::args::Args;

/// Values read from the configuration file.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Steam installation directory tried before the platform defaults.
    #[serde(default)]
    pub steam_root: Option<PathBuf>,

    /// Global cfg directory override.
    #[serde(default)]
    pub cfg_dir: Option<PathBuf>,

    /// Profile to select when several exist.
    #[serde(default)]
    pub profile: Option<String>,

    #[serde(default = "default_true")]
    pub install_global: bool,

    #[serde(default)]
    pub install_user: bool,

    /// Continue without asking when a backup fails.
    #[serde(default)]
    pub assume_yes: bool,

    #[serde(default)]
    pub layout: GameLayout,
}

fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            steam_root: None,
            cfg_dir: None,
            profile: None,
            install_global: default_true(),
            install_user: false,
            assume_yes: false,
            layout: GameLayout::default(),
        }
    }
}

/// Effective settings after command-line flags are applied over the file.
#[derive(Debug, Clone)]
pub struct Settings {
    pub inputs: Vec<PathBuf>,
    pub steam_root: Option<PathBuf>,
    pub cfg_dir: Option<PathBuf>,
    pub profile: Option<String>,
    pub categories: CategorySet,
    pub assume_yes: bool,
    pub json: bool,
    pub layout: GameLayout,
}

impl Config {
    /// Loads `path`, or the default location when `None`.
    ///
    /// A missing default file yields defaults; an explicitly named file must
    /// exist.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let (path, explicit) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (config_path(), false),
        };

        if !explicit && !path.exists() {
            tracing::debug!(path = %path.display(), "no configuration file, using defaults");
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config = Self::parse(&content).with_context(|| format!("parsing {}", path.display()))?;
        tracing::debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    pub fn parse(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Applies command-line flags on top of the file values.
    pub fn merge(self, args: &Args) -> Settings {
        Settings {
            inputs: args.inputs.clone(),
            steam_root: args.steam_root.clone().or(self.steam_root),
            cfg_dir: args.cfg_dir.clone().or(self.cfg_dir),
            profile: args.profile.clone().or(self.profile),
            categories: CategorySet::new(
                args.install_global(self.install_global),
                args.user || self.install_user,
            ),
            assume_yes: args.yes || self.assume_yes,
            json: args.json,
            layout: self.layout,
        }
    }
}

/// Returns the platform-specific configuration file path.
fn config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        let appdata =
            std::env::var("APPDATA").unwrap_or_else(|_| "C:\\Users\\Default\\AppData".into());
        PathBuf::from(appdata).join("cfgdeploy").join("config.toml")
    }

    #[cfg(not(target_os = "windows"))]
    {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        PathBuf::from(home)
            .join(".config")
            .join("cfgdeploy")
            .join("config.toml")
    }
}
