//! Install payload selection.

use std::path::PathBuf;

use crate::classify::is_archive;
use crate::error::FileOpsError;

/// What the user asked to install.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// A single ZIP archive, extracted before routing.
    Archive(PathBuf),
    /// Loose files, routed one by one.
    FileList(Vec<PathBuf>),
}

impl Payload {
    /// Builds a payload from user-supplied paths.
    ///
    /// A single path ending in `.zip` selects archive mode; anything else is a
    /// file list. An empty list is rejected.
    pub fn from_paths(paths: Vec<PathBuf>) -> Result<Self, FileOpsError> {
        match paths.as_slice() {
            [] => Err(FileOpsError::EmptyPayload),
            [single] if is_archive(single) => Ok(Payload::Archive(single.clone())),
            _ => Ok(Payload::FileList(paths)),
        }
    }

    /// Number of top-level inputs (1 for an archive).
    pub fn len(&self) -> usize {
        match self {
            Payload::Archive(_) => 1,
            Payload::FileList(files) => files.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Splits console input into paths.
///
/// Separators are `;` and whitespace. Double-quoted segments are kept whole
/// (so dragged paths with spaces survive) and the quotes are dropped.
pub fn split_input(input: &str) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for c in input.chars() {
        match c {
            '"' => in_quotes = !in_quotes,
            ';' if !in_quotes => flush(&mut current, &mut paths),
            c if c.is_whitespace() && !in_quotes => flush(&mut current, &mut paths),
            c => current.push(c),
        }
    }
    flush(&mut current, &mut paths);

    paths
}

fn flush(current: &mut String, paths: &mut Vec<PathBuf>) {
    if !current.is_empty() {
        paths.push(PathBuf::from(std::mem::take(current)));
    }
}
