//! Session error types.

use cfgdeploy_file_ops::FileOpsError;
use cfgdeploy_protocol::Category;
use cfgdeploy_steam::SteamError;

/// Errors produced by session updates and the install workflow.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("steam root is not known")]
    NoRoot,

    #[error("no category selected")]
    NoCategorySelected,

    #[error("{0} directory is not known")]
    MissingTarget(Category),

    #[error("backup of {category} failed, install aborted")]
    BackupDeclined {
        category: Category,
        #[source]
        source: FileOpsError,
    },

    #[error("steam error: {0}")]
    Steam(#[from] SteamError),

    #[error(transparent)]
    FileOps(#[from] FileOpsError),

    #[error("background install failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}
