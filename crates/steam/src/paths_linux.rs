use std::path::PathBuf;

use crate::SteamError;
use crate::probe::RootSource;

/// A Steam location relative to `$HOME`.
#[derive(Debug, Clone)]
pub struct HomeDirSource {
    pub relative: &'static [&'static str],
}

/// Returns the well-known Steam locations, most common first.
pub(crate) fn home_sources() -> Vec<Box<dyn RootSource>> {
    const LOCATIONS: &[&[&str]] = &[
        // Primary location, usually a symlink maintained by the client.
        &[".steam", "steam"],
        &[".local", "share", "Steam"],
        // Flatpak
        &[".var", "app", "com.valvesoftware.Steam", ".steam", "steam"],
    ];

    LOCATIONS
        .iter()
        .copied()
        .map(|relative| Box::new(HomeDirSource { relative }) as Box<dyn RootSource>)
        .collect()
}

impl RootSource for HomeDirSource {
    fn describe(&self) -> String {
        format!("~/{}", self.relative.join("/"))
    }

    fn read(&self) -> Result<String, SteamError> {
        let home = home_dir().ok_or(SteamError::NotFound)?;
        let path = self
            .relative
            .iter()
            .fold(home, |acc, segment| acc.join(segment));
        Ok(path.to_string_lossy().into_owned())
    }
}

fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .filter(|h| !h.is_empty())
        .map(PathBuf::from)
}
