//! File operation error types.

use std::path::PathBuf;

/// Errors produced while backing up or installing.
#[derive(Debug, thiserror::Error)]
pub enum FileOpsError {
    #[error("{label} directory not found: {}", .path.display())]
    DirectoryNotFound { label: &'static str, path: PathBuf },

    #[error("no files to install")]
    EmptyPayload,

    #[error("archive not found: {}", .0.display())]
    ArchiveNotFound(PathBuf),

    #[error("failed to extract {}: {reason}", .path.display())]
    Extraction { path: PathBuf, reason: String },

    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
