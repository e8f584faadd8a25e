use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::SteamError;
use crate::paths::Paths;

/// Name of a profile folder under `userdata` (a Steam account id).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProfileId(String);

impl ProfileId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProfileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProfileId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ProfileId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Lists the profile folders under `<root>/userdata`, sorted by name.
///
/// A missing userdata directory yields an empty list.
pub fn list_profiles(root: &Path) -> Result<Vec<ProfileId>, SteamError> {
    let user_data_dir = Paths::with_base(root).user_data_dir();

    let entries = match fs::read_dir(&user_data_dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(SteamError::Io(e.to_string())),
    };

    let mut profiles = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| SteamError::Io(e.to_string()))?;

        if !entry.file_type().map(|ft| ft.is_dir()).unwrap_or(false) {
            continue;
        }

        profiles.push(ProfileId::new(entry.file_name().to_string_lossy()));
    }

    profiles.sort();
    Ok(profiles)
}
