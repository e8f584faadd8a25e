//! Configuration directory resolution.

use std::path::{Path, PathBuf};

use crate::layout::GameLayout;
use crate::library::list_libraries;
use crate::paths::{Paths, game_cfg_dir};

/// Finds the game's global cfg directory across the Steam libraries.
///
/// Libraries are tried in manifest order and the first existing directory
/// wins, even if it is empty. Returns `None` when the root or the manifest is
/// missing.
pub fn resolve_global_cfg(root: &Path, layout: &GameLayout) -> Option<PathBuf> {
    if !root.is_dir() || !Paths::with_base(root).library_manifest().is_file() {
        return None;
    }

    list_libraries(root)
        .into_iter()
        .map(|library| game_cfg_dir(&library, layout))
        .find(|candidate| candidate.is_dir())
}

/// Returns the per-profile cfg directory if it exists.
pub fn resolve_user_cfg(root: &Path, profile: &str, layout: &GameLayout) -> Option<PathBuf> {
    let dir = Paths::with_base(root).user_cfg_dir(profile, layout);
    dir.is_dir().then_some(dir)
}
