//! Steam installation root detection.
//!
//! Candidate locations are read from an ordered list of [`RootSource`]s. A
//! source that cannot be read is skipped without surfacing an error; the first
//! candidate that is an existing directory holding the marker executable wins.

use std::path::{MAIN_SEPARATOR, Path, PathBuf};

use cfgdeploy_protocol::EventSink;

use crate::SteamError;

/// File that must exist directly inside a Steam root.
#[cfg(target_os = "windows")]
pub const MARKER_EXECUTABLE: &str = "steam.exe";

/// File that must exist directly inside a Steam root.
#[cfg(not(target_os = "windows"))]
pub const MARKER_EXECUTABLE: &str = "steam.sh";

/// A place that may hold the Steam installation path.
pub trait RootSource: Send + Sync {
    /// Short description for diagnostics.
    fn describe(&self) -> String;

    /// Reads the raw path string.
    fn read(&self) -> Result<String, SteamError>;
}

/// A source holding a path supplied by the user or a config file.
#[derive(Debug, Clone)]
pub struct FixedSource {
    label: String,
    value: String,
}

impl FixedSource {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

impl RootSource for FixedSource {
    fn describe(&self) -> String {
        self.label.clone()
    }

    fn read(&self) -> Result<String, SteamError> {
        if self.value.trim().is_empty() {
            return Err(SteamError::NotFound);
        }
        Ok(self.value.clone())
    }
}

/// Returns the platform's default probe order.
#[cfg(target_os = "windows")]
pub fn default_sources() -> Vec<Box<dyn RootSource>> {
    crate::paths_windows::registry_sources()
}

/// Returns the platform's default probe order.
#[cfg(target_os = "linux")]
pub fn default_sources() -> Vec<Box<dyn RootSource>> {
    crate::paths_linux::home_sources()
}

/// Returns the platform's default probe order.
#[cfg(not(any(target_os = "linux", target_os = "windows")))]
pub fn default_sources() -> Vec<Box<dyn RootSource>> {
    Vec::new()
}

/// Normalizes a raw candidate: unifies separators and drops trailing ones.
pub fn normalize_candidate(raw: &str) -> PathBuf {
    let mut normalized: String = raw
        .trim()
        .trim_matches('"')
        .chars()
        .map(|c| if c == '/' || c == '\\' { MAIN_SEPARATOR } else { c })
        .collect();

    while normalized.len() > 1 && normalized.ends_with(MAIN_SEPARATOR) {
        normalized.pop();
    }

    PathBuf::from(normalized)
}

/// Returns true if `path` is a directory containing `marker`.
pub fn is_valid_root(path: &Path, marker: &str) -> bool {
    path.is_dir() && path.join(marker).is_file()
}

/// Tries each source in order and returns the first valid root.
///
/// Read failures and invalid candidates are skipped silently.
pub fn first_valid_root(sources: &[Box<dyn RootSource>], marker: &str) -> Option<PathBuf> {
    sources.iter().find_map(|source| match source.read() {
        Ok(raw) => {
            let candidate = normalize_candidate(&raw);
            if is_valid_root(&candidate, marker) {
                Some(candidate)
            } else {
                tracing::debug!(
                    source = %source.describe(),
                    candidate = %candidate.display(),
                    "candidate rejected"
                );
                None
            }
        }
        Err(e) => {
            tracing::debug!(source = %source.describe(), error = %e, "source not readable");
            None
        }
    })
}

/// Detects the Steam root from `sources`, reporting the outcome to `sink`.
///
/// Not finding a root is not an error.
pub fn detect_root(sources: &[Box<dyn RootSource>], sink: &dyn EventSink) -> Option<PathBuf> {
    match first_valid_root(sources, MARKER_EXECUTABLE) {
        Some(root) => {
            tracing::info!(root = %root.display(), "steam root detected");
            sink.ok(&format!("Steam root: {}", root.display()));
            Some(root)
        }
        None => {
            sink.warn("Steam root not found");
            None
        }
    }
}
