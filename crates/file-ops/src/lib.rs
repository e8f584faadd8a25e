//! Backup archives and payload installation.
//!
//! Provides the two filesystem-mutating halves of the pipeline:
//!
//! 1. **Backup**: snapshot a cfg directory into a sibling ZIP
//! 2. **Install**: extract or enumerate a payload, route each file by
//!    extension and copy it into the matching cfg directory

mod backup;
mod classify;
mod error;
mod install;
mod payload;
mod report;

pub use backup::{backup_path, create_backup, write_archive};
pub use classify::{Route, classify, is_archive};
pub use error::FileOpsError;
pub use install::{Targets, extract_archive, install};
pub use payload::{Payload, split_input};
pub use report::{CopyFailure, InstallReport};

/// Prefix of the temporary directories archives are extracted into.
pub const TEMP_DIR_PREFIX: &str = "cfgdeploy_";
