//! Backup-then-install workflow.

use std::path::PathBuf;
use std::sync::Arc;

use cfgdeploy_file_ops::{FileOpsError, InstallReport, Payload, Targets, create_backup, install};
use cfgdeploy_protocol::{Category, CategorySet, EventSink};

use crate::error::SessionError;
use crate::session::Session;

/// A payload and the categories it should be installed into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallRequest {
    pub payload: Payload,
    pub categories: CategorySet,
}

impl InstallRequest {
    pub fn new(payload: Payload, categories: CategorySet) -> Self {
        Self {
            payload,
            categories,
        }
    }

    /// Checks that something is selected, the payload is not empty, and
    /// every selected target is known.
    pub fn validate(&self, targets: &Targets) -> Result<(), SessionError> {
        if self.categories.is_empty() {
            return Err(SessionError::NoCategorySelected);
        }
        if self.payload.is_empty() {
            return Err(FileOpsError::EmptyPayload.into());
        }

        match self
            .categories
            .iter()
            .find(|category| targets.get(*category).is_none())
        {
            Some(category) => Err(SessionError::MissingTarget(category)),
            None => Ok(()),
        }
    }
}

/// Result of a completed workflow.
#[derive(Debug, Clone)]
pub struct InstallOutcome {
    /// Backups written before installing, in category order.
    pub backups: Vec<(Category, PathBuf)>,
    pub report: InstallReport,
}

/// What to do when a backup fails and nobody can be asked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BackupPolicy {
    #[default]
    Abort,
    Continue,
}

impl BackupPolicy {
    pub fn continue_after_failure(self) -> bool {
        matches!(self, BackupPolicy::Continue)
    }
}

/// Validates `request`, backs up every enabled category, then installs.
///
/// `on_backup_failure` decides whether a failed backup still lets the install
/// proceed; returning `false` aborts with [`SessionError::BackupDeclined`].
pub fn run_install(
    session: &Session,
    request: &InstallRequest,
    sink: &dyn EventSink,
    on_backup_failure: &mut dyn FnMut(Category, &FileOpsError) -> bool,
) -> Result<InstallOutcome, SessionError> {
    execute(&session.targets(), request, sink, on_backup_failure)
}

/// Runs [`run_install`] on Tokio's blocking pool.
///
/// Targets are captured from `session` before the work is handed off.
pub async fn run_install_in_background(
    session: &Session,
    request: InstallRequest,
    sink: Arc<dyn EventSink>,
    policy: BackupPolicy,
) -> Result<InstallOutcome, SessionError> {
    let targets = session.targets();

    tokio::task::spawn_blocking(move || {
        let mut decide = |_: Category, _: &FileOpsError| policy.continue_after_failure();
        execute(&targets, &request, sink.as_ref(), &mut decide)
    })
    .await?
}

fn execute(
    targets: &Targets,
    request: &InstallRequest,
    sink: &dyn EventSink,
    on_backup_failure: &mut dyn FnMut(Category, &FileOpsError) -> bool,
) -> Result<InstallOutcome, SessionError> {
    request.validate(targets)?;

    let mut backups = Vec::new();
    for category in request.categories.iter() {
        let Some(dir) = targets.get(category) else {
            continue;
        };

        match create_backup(dir, category, sink) {
            Ok(path) => backups.push((category, path)),
            Err(e) => {
                tracing::warn!(category = %category, error = %e, "backup failed");
                sink.warn(&format!("Backup failed: {e}"));
                if !on_backup_failure(category, &e) {
                    sink.warn("Install cancelled");
                    return Err(SessionError::BackupDeclined {
                        category,
                        source: e,
                    });
                }
            }
        }
    }

    let report = install(&request.payload, request.categories, targets, sink)?;
    tracing::info!(
        copied = report.total_copied(),
        failed = report.failed(),
        skipped = report.skipped,
        backups = backups.len(),
        "install workflow finished"
    );
    sink.ok("Done");

    Ok(InstallOutcome { backups, report })
}
