use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Kind of configuration directory a payload can be installed into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Category {
    /// Game-wide `cfg` directory inside the install tree (`*.cfg` files).
    Global,
    /// Per-profile `local/cfg` directory under `userdata` (video presets, `*.txt`).
    PerUser,
}

impl Category {
    /// Returns both categories in install order.
    pub fn all() -> &'static [Category] {
        &[Category::Global, Category::PerUser]
    }

    /// Human-readable label used in log lines and errors.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Global => "global cfg",
            Category::PerUser => "user cfg (video preset)",
        }
    }

    /// File name of the snapshot written next to the category directory.
    pub fn backup_file_name(&self) -> &'static str {
        match self {
            Category::Global => "cfg_backup.zip",
            Category::PerUser => "user_cfg_backup.zip",
        }
    }

    /// File extension (without dot) routed to this category.
    pub fn extension(&self) -> &'static str {
        match self {
            Category::Global => "cfg",
            Category::PerUser => "txt",
        }
    }

    /// Returns the backup archive path for a directory of this category.
    ///
    /// Always `parent(dir)/<backup file name>`; `None` when `dir` has no parent.
    pub fn backup_path(&self, dir: &Path) -> Option<PathBuf> {
        dir.parent().map(|parent| parent.join(self.backup_file_name()))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Which categories an install call should touch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySet {
    pub global: bool,
    pub per_user: bool,
}

impl CategorySet {
    pub fn new(global: bool, per_user: bool) -> Self {
        Self { global, per_user }
    }

    pub fn contains(&self, category: Category) -> bool {
        match category {
            Category::Global => self.global,
            Category::PerUser => self.per_user,
        }
    }

    pub fn is_empty(&self) -> bool {
        !self.global && !self.per_user
    }

    /// Iterates over the enabled categories in install order.
    pub fn iter(&self) -> impl Iterator<Item = Category> + '_ {
        Category::all().iter().copied().filter(|c| self.contains(*c))
    }
}
