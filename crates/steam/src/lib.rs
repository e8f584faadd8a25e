pub mod layout;
pub mod library;
pub mod paths;
#[cfg(target_os = "linux")]
pub mod paths_linux;
#[cfg(target_os = "windows")]
pub mod paths_windows;
pub mod probe;
pub mod resolve;
pub mod users;

// Re-export primary types.
pub use layout::GameLayout;
pub use library::{list_libraries, parse_library_paths};
pub use paths::{Paths, game_cfg_dir};
pub use probe::{
    FixedSource, MARKER_EXECUTABLE, RootSource, default_sources, detect_root, first_valid_root,
    is_valid_root, normalize_candidate,
};
pub use resolve::{resolve_global_cfg, resolve_user_cfg};
pub use users::{ProfileId, list_profiles};

/// Errors for Steam operations.
#[derive(Debug, thiserror::Error)]
pub enum SteamError {
    #[error("steam installation not found")]
    NotFound,

    #[error("registry value not readable: {0}")]
    Registry(String),

    #[error("I/O error: {0}")]
    Io(String),
}
