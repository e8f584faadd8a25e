use std::path::{Path, PathBuf};

use crate::layout::GameLayout;
use crate::probe::MARKER_EXECUTABLE;

/// Provides access to the directories under a Steam installation root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paths {
    base_dir: PathBuf,
}

impl Paths {
    /// Creates a new `Paths` instance rooted at `base_dir`.
    pub fn with_base(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Returns the Steam base directory.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Returns the path of the marker executable that proves this is a Steam root.
    pub fn marker_path(&self) -> PathBuf {
        self.base_dir.join(MARKER_EXECUTABLE)
    }

    /// Returns the steamapps directory.
    pub fn steamapps_dir(&self) -> PathBuf {
        self.base_dir.join("steamapps")
    }

    /// Returns the path to libraryfolders.vdf.
    pub fn library_manifest(&self) -> PathBuf {
        self.steamapps_dir().join("libraryfolders.vdf")
    }

    /// Returns the userdata directory.
    pub fn user_data_dir(&self) -> PathBuf {
        self.base_dir.join("userdata")
    }

    /// Returns the directory for a specific profile.
    pub fn user_dir(&self, profile: &str) -> PathBuf {
        self.user_data_dir().join(profile)
    }

    /// Returns the per-profile cfg directory for a game.
    pub fn user_cfg_dir(&self, profile: &str, layout: &GameLayout) -> PathBuf {
        self.user_dir(profile)
            .join(&layout.app_id)
            .join("local")
            .join("cfg")
    }
}

/// Returns the global cfg directory candidate inside a library root.
pub fn game_cfg_dir(library: &Path, layout: &GameLayout) -> PathBuf {
    layout.cfg_dir(library)
}
