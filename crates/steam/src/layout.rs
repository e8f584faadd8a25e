use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Fixed relative locations of the game's configuration inside a Steam tree.
///
/// Defaults describe Counter-Strike 2. Subpaths use `/` regardless of platform
/// and are joined component by component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameLayout {
    /// Steam app id; names the per-profile directory under `userdata/<id>/`.
    #[serde(default = "default_app_id")]
    pub app_id: String,

    /// Game install directory relative to a library root.
    #[serde(default = "default_install_dir")]
    pub install_dir: String,

    /// Global cfg directory relative to the game install directory.
    #[serde(default = "default_cfg_subpath")]
    pub cfg_subpath: String,
}

fn default_app_id() -> String {
    "730".into()
}

fn default_install_dir() -> String {
    "steamapps/common/Counter-Strike Global Offensive".into()
}

fn default_cfg_subpath() -> String {
    "game/csgo/cfg".into()
}

impl Default for GameLayout {
    fn default() -> Self {
        Self {
            app_id: default_app_id(),
            install_dir: default_install_dir(),
            cfg_subpath: default_cfg_subpath(),
        }
    }
}

impl GameLayout {
    /// Returns `<library>/<install_dir>`.
    pub fn game_dir(&self, library: &Path) -> PathBuf {
        join_relative(library, &self.install_dir)
    }

    /// Returns `<library>/<install_dir>/<cfg_subpath>`.
    pub fn cfg_dir(&self, library: &Path) -> PathBuf {
        join_relative(&self.game_dir(library), &self.cfg_subpath)
    }
}

/// Joins a `/`-separated relative path onto `base`, skipping empty segments.
pub(crate) fn join_relative(base: &Path, relative: &str) -> PathBuf {
    relative
        .split(['/', '\\'])
        .filter(|segment| !segment.is_empty())
        .fold(base.to_path_buf(), |acc, segment| acc.join(segment))
}
