//! Extension-based routing of payload files.

use std::path::Path;

use cfgdeploy_protocol::Category;

/// Where a payload file should go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Global,
    PerUser,
    Unclassified,
}

impl Route {
    /// Returns the target category, if any.
    pub fn category(&self) -> Option<Category> {
        match self {
            Route::Global => Some(Category::Global),
            Route::PerUser => Some(Category::PerUser),
            Route::Unclassified => None,
        }
    }
}

/// Classifies a file by the suffix of its name (case-insensitive).
pub fn classify(path: &Path) -> Route {
    if name_has_extension(path, Category::Global.extension()) {
        Route::Global
    } else if name_has_extension(path, Category::PerUser.extension()) {
        Route::PerUser
    } else {
        Route::Unclassified
    }
}

/// Returns true if `path` names a ZIP archive.
pub fn is_archive(path: &Path) -> bool {
    name_has_extension(path, "zip")
}

fn name_has_extension(path: &Path, ext: &str) -> bool {
    let Some(name) = path.file_name() else {
        return false;
    };
    let name = name.to_string_lossy().to_ascii_lowercase();
    name.len() > ext.len()
        && name.ends_with(&ext.to_ascii_lowercase())
        && name.as_bytes()[name.len() - ext.len() - 1] == b'.'
}
