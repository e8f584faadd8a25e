//! Library folder discovery from `steamapps/libraryfolders.vdf`.
//!
//! The manifest is scanned for `"path" "<value>"` pairs rather than parsed as
//! a full text VDF tree; anything unreadable degrades to "no libraries".

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use crate::paths::Paths;

static PATH_ENTRY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""path"\s*"([^"]+)""#).expect("library path pattern"));

/// Extracts every library path from manifest text, in file order.
///
/// Escaped backslashes (`\\`) in values are collapsed to single ones.
/// Duplicates are kept.
pub fn parse_library_paths(content: &str) -> Vec<String> {
    PATH_ENTRY
        .captures_iter(content)
        .filter_map(|caps| caps.get(1))
        .map(|value| value.as_str().replace(r"\\", r"\"))
        .collect()
}

/// Lists the library roots recorded under a Steam root.
///
/// Returns an empty list if the root or the manifest is missing or unreadable.
pub fn list_libraries(root: &Path) -> Vec<PathBuf> {
    if !root.is_dir() {
        return Vec::new();
    }

    let manifest = Paths::with_base(root).library_manifest();
    let content = match fs::read_to_string(&manifest) {
        Ok(c) => c,
        Err(e) => {
            tracing::debug!(manifest = %manifest.display(), error = %e, "library manifest not readable");
            return Vec::new();
        }
    };

    let libraries: Vec<PathBuf> = parse_library_paths(&content)
        .into_iter()
        .map(PathBuf::from)
        .collect();
    tracing::debug!(count = libraries.len(), "library folders found");
    libraries
}
