//! Payload installation.
//!
//! Per call: `Extracting (archive only) -> CopyingGlobal -> CopyingPerUser ->
//! CleaningUp -> Done`. A failed copy is recorded and the batch continues;
//! only extraction or a fault that stops the walk aborts the call, and the
//! temporary directory is removed either way.

use std::collections::HashMap;
use std::ffi::OsStr;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use cfgdeploy_protocol::{Category, CategorySet, Event, EventSink};
use walkdir::WalkDir;
use zip::ZipArchive;

use crate::TEMP_DIR_PREFIX;
use crate::classify::classify;
use crate::error::FileOpsError;
use crate::payload::Payload;
use crate::report::InstallReport;

/// Resolved destination directories.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Targets {
    pub global_cfg_dir: Option<PathBuf>,
    pub user_cfg_dir: Option<PathBuf>,
}

impl Targets {
    pub fn get(&self, category: Category) -> Option<&Path> {
        match category {
            Category::Global => self.global_cfg_dir.as_deref(),
            Category::PerUser => self.user_cfg_dir.as_deref(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Stage {
    Extracting,
    CopyingGlobal,
    CopyingPerUser,
    CleaningUp,
    Done,
}

/// Destinations that will actually receive files in this call.
struct ActiveTargets<'a> {
    global: Option<&'a Path>,
    per_user: Option<&'a Path>,
}

impl<'a> ActiveTargets<'a> {
    /// Keeps a target only if its category is enabled and the directory
    /// exists. Target directories are never created here.
    ///
    /// An enabled category without a directory is a no-op, not an error.
    fn new(categories: CategorySet, targets: &'a Targets, sink: &dyn EventSink) -> Self {
        let pick = |category: Category| {
            if !categories.contains(category) {
                return None;
            }
            let Some(dir) = targets.get(category) else {
                tracing::warn!(category = %category, "target directory unknown, category skipped");
                sink.warn(&format!("{} directory unknown, skipping", category.label()));
                return None;
            };
            if !dir.is_dir() {
                tracing::warn!(category = %category, dir = %dir.display(), "target directory missing, category skipped");
                sink.warn(&format!(
                    "{} directory not found: {}, skipping",
                    category.label(),
                    dir.display()
                ));
                return None;
            }
            Some(dir)
        };

        Self {
            global: pick(Category::Global),
            per_user: pick(Category::PerUser),
        }
    }

    fn get(&self, category: Category) -> Option<&'a Path> {
        match category {
            Category::Global => self.global,
            Category::PerUser => self.per_user,
        }
    }
}

/// Installs `payload` into the enabled categories and reports the outcome.
///
/// The summary is emitted to `sink` and the same numbers are returned.
pub fn install(
    payload: &Payload,
    categories: CategorySet,
    targets: &Targets,
    sink: &dyn EventSink,
) -> Result<InstallReport, FileOpsError> {
    let active = ActiveTargets::new(categories, targets, sink);

    let report = match payload {
        Payload::Archive(archive) => install_from_archive(archive, &active, sink)?,
        Payload::FileList(files) => install_from_files(files, &active, sink),
    };

    for line in report.summary_lines(categories) {
        sink.emit(Event::Log(line));
    }
    tracing::debug!(stage = ?Stage::Done, copied = report.total_copied(), failed = report.failed(), "install finished");
    Ok(report)
}

fn install_from_archive(
    archive: &Path,
    active: &ActiveTargets<'_>,
    sink: &dyn EventSink,
) -> Result<InstallReport, FileOpsError> {
    let display_name = archive
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| archive.display().to_string());
    sink.info(&format!("Installing {display_name}"));

    if !archive.is_file() {
        return Err(FileOpsError::ArchiveNotFound(archive.to_path_buf()));
    }

    let temp = tempfile::Builder::new()
        .prefix(TEMP_DIR_PREFIX)
        .tempdir()?;

    let result = install_extracted(archive, temp.path(), active, sink);

    tracing::debug!(stage = ?Stage::CleaningUp, dir = %temp.path().display(), "removing extraction dir");
    let temp_path = temp.path().to_path_buf();
    if let Err(e) = temp.close() {
        tracing::warn!(dir = %temp_path.display(), error = %e, "failed to remove extraction dir");
        sink.warn(&format!(
            "Could not remove temporary directory {}: {e}",
            temp_path.display()
        ));
    }

    result
}

fn install_extracted(
    archive: &Path,
    temp: &Path,
    active: &ActiveTargets<'_>,
    sink: &dyn EventSink,
) -> Result<InstallReport, FileOpsError> {
    tracing::debug!(stage = ?Stage::Extracting, archive = %archive.display(), "extracting");
    sink.info("Extracting archive...");
    let entries = extract_archive(archive, temp)?;
    sink.ok(&format!("Extraction complete ({entries} entries)"));

    let files = collect_files(temp)?;
    let mut handled = vec![false; files.len()];
    let mut report = InstallReport::default();

    // Global cfg files keep their layout under the extraction root.
    if let Some(dir) = active.global {
        tracing::debug!(stage = ?Stage::CopyingGlobal, dest = %dir.display(), "copying");
        for (i, rel) in files.iter().enumerate() {
            if classify(rel).category() != Some(Category::Global) {
                continue;
            }
            handled[i] = true;
            copy_nested_item(&temp.join(rel), dir, rel, Category::Global, &mut report);
        }
    }

    // Presets are flattened into the profile's cfg directory. When two
    // presets share a file name, the last one in walk order wins.
    if let Some(dir) = active.per_user {
        tracing::debug!(stage = ?Stage::CopyingPerUser, dest = %dir.display(), "copying");
        let presets: Vec<(usize, &OsStr)> = files
            .iter()
            .enumerate()
            .filter(|(_, rel)| classify(rel).category() == Some(Category::PerUser))
            .filter_map(|(i, rel)| rel.file_name().map(|name| (i, name)))
            .collect();
        let last_by_name: HashMap<&OsStr, usize> =
            presets.iter().map(|&(i, name)| (name, i)).collect();

        for (i, name) in presets {
            let rel = &files[i];
            handled[i] = true;
            if let Some(&kept) = last_by_name.get(name).filter(|&&kept| kept != i) {
                let (item, kept) = (item_name(rel), item_name(&files[kept]));
                tracing::warn!(item = %item, kept = %kept, "duplicate preset name, skipped");
                sink.warn(&format!("Duplicate preset {item}: keeping {kept}"));
                report.record_skip();
                continue;
            }
            copy_item(&temp.join(rel), &dir.join(name), Category::PerUser, &item_name(rel), &mut report);
        }
    }

    for _ in handled.iter().filter(|h| !**h) {
        report.record_skip();
    }

    Ok(report)
}

fn install_from_files(
    files: &[PathBuf],
    active: &ActiveTargets<'_>,
    sink: &dyn EventSink,
) -> InstallReport {
    sink.info(&format!("Installing {} file(s)...", files.len()));
    let mut report = InstallReport::default();

    for file in files {
        if !file.is_file() {
            tracing::debug!(file = %file.display(), "source missing, ignored");
            continue;
        }
        let Some(name) = file.file_name() else {
            continue;
        };

        let destination = classify(file)
            .category()
            .and_then(|category| active.get(category).map(|dir| (category, dir)));

        match destination {
            Some((category, dir)) => {
                let item = name.to_string_lossy().into_owned();
                copy_item(file, &dir.join(name), category, &item, &mut report);
            }
            None => report.record_skip(),
        }
    }

    report
}

/// Extracts every entry of a ZIP into `dest`. All-or-nothing from the
/// caller's point of view: any failure is returned as `Extraction`.
pub fn extract_archive(archive: &Path, dest: &Path) -> Result<usize, FileOpsError> {
    let extraction = |reason: String| FileOpsError::Extraction {
        path: archive.to_path_buf(),
        reason,
    };

    let file = File::open(archive).map_err(|e| extraction(e.to_string()))?;
    let mut zip = ZipArchive::new(file).map_err(|e| extraction(e.to_string()))?;
    let entries = zip.len();
    zip.extract(dest).map_err(|e| extraction(e.to_string()))?;

    tracing::debug!(archive = %archive.display(), entries, "archive extracted");
    Ok(entries)
}

/// Lists files under `root` as relative paths, sorted for stable reports.
fn collect_files(root: &Path) -> Result<Vec<PathBuf>, FileOpsError> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root).min_depth(1).sort_by_file_name() {
        let entry = entry.map_err(io::Error::from)?;
        if !entry.file_type().is_file() {
            continue;
        }
        let rel = entry
            .path()
            .strip_prefix(root)
            .map_err(io::Error::other)?;
        files.push(rel.to_path_buf());
    }
    Ok(files)
}

/// Copies one file, overwriting the destination, and records the outcome.
fn copy_item(
    src: &Path,
    dest: &Path,
    category: Category,
    item: &str,
    report: &mut InstallReport,
) {
    record_outcome(fs::copy(src, dest).map(drop), dest, category, item, report);
}

/// Like [`copy_item`], but first creates the subdirectories between `root`
/// and `dest`. `root` itself must already exist.
fn copy_nested_item(
    src: &Path,
    root: &Path,
    rel: &Path,
    category: Category,
    report: &mut InstallReport,
) {
    let dest = root.join(rel);
    let result = match rel.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(sub) => fs::create_dir_all(root.join(sub)),
        None => Ok(()),
    }
    .and_then(|()| fs::copy(src, &dest).map(drop));
    record_outcome(result, &dest, category, &item_name(rel), report);
}

fn record_outcome(
    result: io::Result<()>,
    dest: &Path,
    category: Category,
    item: &str,
    report: &mut InstallReport,
) {
    match result {
        Ok(()) => report.record_copy(category),
        Err(e) => {
            tracing::warn!(item, dest = %dest.display(), error = %e, "copy failed");
            report.record_failure(category, item, e.to_string());
        }
    }
}

fn item_name(rel: &Path) -> String {
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
