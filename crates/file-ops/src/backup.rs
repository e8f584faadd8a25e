//! Directory snapshots.
//!
//! A backup is written next to the cfg directory (never inside it) under a
//! fixed per-category name, replacing any previous snapshot.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use cfgdeploy_protocol::{Category, EventSink};
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::FileOpsError;

/// Deflate level used for snapshots.
const COMPRESSION_LEVEL: i64 = 9;

/// Returns where the backup of `dir` is written.
pub fn backup_path(dir: &Path, category: Category) -> Result<PathBuf, FileOpsError> {
    category
        .backup_path(dir)
        .ok_or_else(|| FileOpsError::DirectoryNotFound {
            label: category.label(),
            path: dir.to_path_buf(),
        })
}

/// Archives `dir` into its sibling backup file and returns the backup path.
///
/// An existing backup is deleted first. Not transactional: a crash mid-write
/// leaves a partial archive but never touches `dir`.
pub fn create_backup(
    dir: &Path,
    category: Category,
    sink: &dyn EventSink,
) -> Result<PathBuf, FileOpsError> {
    if !dir.is_dir() {
        return Err(FileOpsError::DirectoryNotFound {
            label: category.label(),
            path: dir.to_path_buf(),
        });
    }

    let backup = backup_path(dir, category)?;
    if backup.exists() {
        fs::remove_file(&backup)?;
        tracing::debug!(path = %backup.display(), "removed previous backup");
    }

    sink.info(&format!("Backing up {}...", category.label()));
    let files = write_archive(dir, &backup)?;

    tracing::info!(
        source = %dir.display(),
        backup = %backup.display(),
        files,
        "backup written"
    );
    sink.ok(&format!(
        "Backed up {} ({files} files) to {}",
        category.label(),
        backup.display()
    ));
    Ok(backup)
}

/// Writes every file under `src` into a new ZIP at `dest`.
///
/// Entry names are relative to `src` with `/` separators; empty directories
/// are kept as directory entries. Returns the number of files written.
pub fn write_archive(src: &Path, dest: &Path) -> Result<usize, FileOpsError> {
    let file = File::create(dest)?;
    let mut writer = ZipWriter::new(file);
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .compression_level(Some(COMPRESSION_LEVEL));

    let mut files = 0usize;
    for entry in WalkDir::new(src).min_depth(1).sort_by_file_name() {
        let entry = entry.map_err(io::Error::from)?;
        let rel = entry
            .path()
            .strip_prefix(src)
            .map_err(io::Error::other)?;
        let name = entry_name(rel);

        if entry.file_type().is_dir() {
            if fs::read_dir(entry.path())?.next().is_none() {
                writer.add_directory(format!("{name}/"), options)?;
            }
        } else if entry.file_type().is_file() {
            writer.start_file(name, options)?;
            let mut source = File::open(entry.path())?;
            io::copy(&mut source, &mut writer)?;
            files += 1;
        }
    }

    writer.finish()?;
    Ok(files)
}

/// Converts a relative path to a ZIP entry name.
fn entry_name(rel: &Path) -> String {
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
