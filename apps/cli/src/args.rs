//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;

/// Back up and install Counter-Strike 2 config presets.
#[derive(Debug, Parser)]
#[command(name = "cfgdeploy", version)]
pub struct Args {
    /// A preset archive (.zip) or loose .cfg / .txt files. Prompted for when empty.
    pub inputs: Vec<PathBuf>,

    /// Steam installation directory, tried before the platform defaults
    #[arg(long = "steam-root")]
    pub steam_root: Option<PathBuf>,

    /// Global cfg directory, skips manifest resolution
    #[arg(long = "cfg-dir")]
    pub cfg_dir: Option<PathBuf>,

    /// Steam profile (userdata folder name) for video presets
    #[arg(long)]
    pub profile: Option<String>,

    /// Install .cfg files into the global cfg directory
    #[arg(long, overrides_with = "no_global")]
    pub global: bool,

    /// Do not install into the global cfg directory
    #[arg(long = "no-global", overrides_with = "global")]
    pub no_global: bool,

    /// Install .txt video presets into the profile's cfg directory
    #[arg(long)]
    pub user: bool,

    /// Continue without asking when a backup fails
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// Configuration file (defaults to the per-user location)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Print the install report as JSON on stdout
    #[arg(long)]
    pub json: bool,
}

impl Args {
    /// Global flag after `--global` / `--no-global`, falling back to `default`.
    pub fn install_global(&self, default: bool) -> bool {
        if self.no_global {
            false
        } else if self.global {
            true
        } else {
            default
        }
    }
}
