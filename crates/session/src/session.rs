//! Resolved installation state.
//!
//! Every setter returns whether the value changed and emits the matching
//! change event only in that case.

use std::path::{Path, PathBuf};

use cfgdeploy_file_ops::Targets;
use cfgdeploy_protocol::{Category, Event, EventSink};
use cfgdeploy_steam::{GameLayout, ProfileId, RootSource};

use crate::error::SessionError;

/// What is currently known about the local Steam installation.
#[derive(Debug, Clone, Default)]
pub struct Session {
    layout: GameLayout,
    root: Option<PathBuf>,
    global_cfg: Option<PathBuf>,
    profiles: Vec<ProfileId>,
    profile: Option<ProfileId>,
    user_cfg: Option<PathBuf>,
}

impl Session {
    /// Creates an empty session for the given game layout.
    pub fn new(layout: GameLayout) -> Self {
        Self {
            layout,
            ..Default::default()
        }
    }

    pub fn layout(&self) -> &GameLayout {
        &self.layout
    }

    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    pub fn global_cfg(&self) -> Option<&Path> {
        self.global_cfg.as_deref()
    }

    /// Profiles found by the last [`Session::refresh_profiles`].
    pub fn profiles(&self) -> &[ProfileId] {
        &self.profiles
    }

    pub fn profile(&self) -> Option<&ProfileId> {
        self.profile.as_ref()
    }

    pub fn user_cfg(&self) -> Option<&Path> {
        self.user_cfg.as_deref()
    }

    /// Directory currently resolved for `category`.
    pub fn cfg_dir(&self, category: Category) -> Option<&Path> {
        match category {
            Category::Global => self.global_cfg(),
            Category::PerUser => self.user_cfg(),
        }
    }

    /// Where the backup of `category` would be written. Derived on every call.
    pub fn backup_path(&self, category: Category) -> Option<PathBuf> {
        self.cfg_dir(category)
            .and_then(|dir| category.backup_path(dir))
    }

    /// Snapshot of the install destinations.
    pub fn targets(&self) -> Targets {
        Targets {
            global_cfg_dir: self.global_cfg.clone(),
            user_cfg_dir: self.user_cfg.clone(),
        }
    }

    /// Re-runs the whole detection chain: root, global cfg, then profiles.
    ///
    /// Stops quietly after the root step when no root is found.
    pub fn refresh(
        &mut self,
        sources: &[Box<dyn RootSource>],
        sink: &dyn EventSink,
    ) -> Result<(), SessionError> {
        self.detect_root(sources, sink);
        if self.root.is_none() {
            return Ok(());
        }

        self.resolve_global_cfg(sink);
        self.refresh_profiles(sink)?;
        Ok(())
    }

    /// Probes `sources` for the root and stores the result.
    pub fn detect_root(&mut self, sources: &[Box<dyn RootSource>], sink: &dyn EventSink) -> bool {
        let root = cfgdeploy_steam::detect_root(sources, sink);
        self.set_root(root, sink)
    }

    /// Replaces the root. Everything derived from the previous root is cleared.
    pub fn set_root(&mut self, root: Option<PathBuf>, sink: &dyn EventSink) -> bool {
        if self.root == root {
            return false;
        }

        tracing::info!(root = ?root, "steam root changed");
        self.root = root;
        sink.emit(Event::RootChanged {
            path: self.root.clone(),
        });

        self.set_global_cfg(None, sink);
        self.profiles.clear();
        self.set_profile(None, sink);
        self.set_user_cfg(None, sink);
        true
    }

    /// Looks up the global cfg directory under the current root.
    pub fn resolve_global_cfg(&mut self, sink: &dyn EventSink) -> bool {
        let resolved = self
            .root
            .as_deref()
            .and_then(|root| cfgdeploy_steam::resolve_global_cfg(root, &self.layout));

        match &resolved {
            Some(dir) => sink.ok(&format!("Global cfg: {}", dir.display())),
            None => sink.warn("Global cfg directory not found"),
        }
        self.set_global_cfg(resolved, sink)
    }

    /// Sets the global cfg directory directly (e.g. a path typed by the user).
    pub fn set_global_cfg(&mut self, dir: Option<PathBuf>, sink: &dyn EventSink) -> bool {
        if self.global_cfg == dir {
            return false;
        }

        let backup_path = dir
            .as_deref()
            .and_then(|d| Category::Global.backup_path(d));
        tracing::debug!(dir = ?dir, "global cfg changed");
        self.global_cfg = dir;
        sink.emit(Event::GlobalCfgChanged {
            path: self.global_cfg.clone(),
            backup_path,
        });
        true
    }

    /// Re-lists the profiles under the current root.
    ///
    /// A selection that no longer exists is dropped; a single profile is
    /// selected automatically.
    pub fn refresh_profiles(&mut self, sink: &dyn EventSink) -> Result<&[ProfileId], SessionError> {
        let root = self.root.as_deref().ok_or(SessionError::NoRoot)?;
        let profiles = cfgdeploy_steam::list_profiles(root)?;

        match profiles.len() {
            0 => sink.warn("No Steam profiles found"),
            n => sink.info(&format!("Found {n} Steam profile(s)")),
        }
        self.profiles = profiles;

        let stale = self
            .profile
            .as_ref()
            .is_some_and(|p| !self.profiles.contains(p));
        if stale {
            self.set_profile(None, sink);
            self.set_user_cfg(None, sink);
        }

        if let [only] = self.profiles.as_slice() {
            let only = only.clone();
            self.select_profile(only, sink)?;
        }

        Ok(&self.profiles)
    }

    /// Selects a profile and resolves its cfg directory.
    ///
    /// Selecting the current profile again does nothing and returns `false`.
    pub fn select_profile(
        &mut self,
        profile: impl Into<ProfileId>,
        sink: &dyn EventSink,
    ) -> Result<bool, SessionError> {
        let profile = profile.into();
        let root = self.root.clone().ok_or(SessionError::NoRoot)?;
        if self.profile.as_ref() == Some(&profile) {
            return Ok(false);
        }

        let user_cfg =
            cfgdeploy_steam::resolve_user_cfg(&root, profile.as_str(), &self.layout);
        if user_cfg.is_none() {
            sink.warn(&format!("No user cfg directory for profile {profile}"));
        }

        self.set_profile(Some(profile), sink);
        if self.set_user_cfg(user_cfg, sink) {
            if let Some(dir) = &self.user_cfg {
                sink.ok(&format!("User cfg: {}", dir.display()));
            }
        }
        Ok(true)
    }

    /// Sets the per-user cfg directory directly.
    pub fn set_user_cfg(&mut self, dir: Option<PathBuf>, sink: &dyn EventSink) -> bool {
        if self.user_cfg == dir {
            return false;
        }

        let backup_path = dir
            .as_deref()
            .and_then(|d| Category::PerUser.backup_path(d));
        tracing::debug!(dir = ?dir, "user cfg changed");
        self.user_cfg = dir;
        sink.emit(Event::UserCfgChanged {
            path: self.user_cfg.clone(),
            backup_path,
        });
        true
    }

    fn set_profile(&mut self, profile: Option<ProfileId>, sink: &dyn EventSink) -> bool {
        if self.profile == profile {
            return false;
        }

        self.profile = profile;
        sink.emit(Event::ProfileChanged {
            profile: self.profile.as_ref().map(ProfileId::to_string),
        });
        true
    }
}
