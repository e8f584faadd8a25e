//! Session state and install workflow.
//!
//! A [`Session`] holds what has been resolved so far (root, cfg directories,
//! selected profile) and only changes through its resolution calls. The
//! workflow runs against a session:
//!
//! 1. **Validate**: at least one category, a known target for each
//! 2. **Back up**: snapshot every enabled category directory
//! 3. **Install**: route the payload into the targets

pub mod error;
pub mod session;
pub mod workflow;

pub use error::SessionError;
pub use session::Session;
pub use workflow::{
    BackupPolicy, InstallOutcome, InstallRequest, run_install, run_install_in_background,
};
