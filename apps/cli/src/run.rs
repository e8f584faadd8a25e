//! Interactive install flow.

use std::io::{BufRead, Write};
use std::process::ExitCode;

use cfgdeploy_file_ops::{FileOpsError, Payload, split_input};
use cfgdeploy_protocol::{Category, EventSink};
use cfgdeploy_session::{InstallRequest, Session, SessionError, run_install};
use cfgdeploy_steam::{FixedSource, RootSource};

use crate::config::Settings;
use crate::console::Prompter;

/// How a run ended, mapped onto the process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Everything selected was installed.
    Success,
    /// The install finished but some items failed to copy.
    Failed,
    /// Invalid input, nothing to do, or cancelled by the user.
    Invalid,
}

impl Status {
    pub fn code(self) -> u8 {
        match self {
            Status::Success => 0,
            Status::Failed => 1,
            Status::Invalid => 2,
        }
    }
}

impl From<Status> for ExitCode {
    fn from(status: Status) -> Self {
        ExitCode::from(status.code())
    }
}

/// Resolves the targets, asks for what is missing, then backs up and installs.
///
/// `defaults` are the platform root sources, tried after a configured root.
pub fn run<R: BufRead, W: Write>(
    settings: &Settings,
    defaults: Vec<Box<dyn RootSource>>,
    prompter: &mut Prompter<R, W>,
    sink: &dyn EventSink,
) -> anyhow::Result<Status> {
    let mut session = Session::new(settings.layout.clone());

    let mut sources: Vec<Box<dyn RootSource>> = Vec::new();
    if let Some(root) = &settings.steam_root {
        sources.push(Box::new(FixedSource::new(
            "configured root",
            root.to_string_lossy().into_owned(),
        )));
    }
    sources.extend(defaults);
    session.refresh(&sources, sink)?;

    if session.root().is_none() {
        if let Some(root) =
            prompter.ask_path("Enter the Steam installation directory (blank to skip):")?
        {
            let prompted: Vec<Box<dyn RootSource>> = vec![Box::new(FixedSource::new(
                "prompt",
                root.to_string_lossy().into_owned(),
            ))];
            session.refresh(&prompted, sink)?;
        }
    }

    if let Some(dir) = &settings.cfg_dir {
        if !dir.is_dir() {
            sink.warn(&format!("Not a directory: {}", dir.display()));
            return Ok(Status::Invalid);
        }
        session.set_global_cfg(Some(dir.clone()), sink);
    } else if settings.categories.contains(Category::Global) && session.global_cfg().is_none() {
        if let Some(dir) = prompter.ask_path("Enter the global cfg directory (game/csgo/cfg):")? {
            if dir.is_dir() {
                session.set_global_cfg(Some(dir), sink);
            } else {
                sink.warn(&format!("Not a directory: {}", dir.display()));
            }
        }
    }

    if settings.categories.contains(Category::PerUser) && session.root().is_some() {
        choose_profile(&mut session, settings.profile.as_deref(), prompter, sink)?;
    }

    let mut inputs = settings.inputs.clone();
    if inputs.is_empty() {
        if let Some(answer) =
            prompter.ask("Enter an archive or cfg/txt files (separated by ';' or spaces):")?
        {
            inputs = split_input(&answer);
        }
    }

    let payload = match Payload::from_paths(inputs) {
        Ok(payload) => payload,
        Err(FileOpsError::EmptyPayload) => {
            sink.warn("Nothing to install");
            return Ok(Status::Invalid);
        }
        Err(e) => return Err(e.into()),
    };

    let request = InstallRequest::new(payload, settings.categories);
    let assume_yes = settings.assume_yes;
    let mut on_backup_failure = |category: Category, _: &FileOpsError| {
        assume_yes
            || prompter
                .confirm(&format!("Backup of {category} failed. Install anyway?"))
                .unwrap_or(false)
    };

    match run_install(&session, &request, sink, &mut on_backup_failure) {
        Ok(outcome) => {
            if settings.json {
                println!("{}", serde_json::to_string_pretty(&outcome.report)?);
            }
            Ok(if outcome.report.is_clean() {
                Status::Success
            } else {
                Status::Failed
            })
        }
        Err(e @ (SessionError::NoCategorySelected | SessionError::MissingTarget(_))) => {
            sink.warn(&e.to_string());
            Ok(Status::Invalid)
        }
        Err(SessionError::BackupDeclined { .. }) => Ok(Status::Invalid),
        Err(e) => Err(e.into()),
    }
}

/// Selects the requested profile, or asks when several exist and none is
/// selected yet.
fn choose_profile<R: BufRead, W: Write>(
    session: &mut Session,
    wanted: Option<&str>,
    prompter: &mut Prompter<R, W>,
    sink: &dyn EventSink,
) -> anyhow::Result<()> {
    if let Some(id) = wanted {
        session.select_profile(id, sink)?;
        return Ok(());
    }
    if session.profile().is_some() || session.profiles().is_empty() {
        return Ok(());
    }

    let profiles = session.profiles().to_vec();
    for (i, profile) in profiles.iter().enumerate() {
        sink.info(&format!("[{}] {profile}", i + 1));
    }

    let Some(answer) = prompter.ask("Select a profile (number or id):")? else {
        return Ok(());
    };
    let picked = answer
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|i| profiles.get(i))
        .or_else(|| profiles.iter().find(|p| p.as_str() == answer));

    match picked {
        Some(profile) => {
            session.select_profile(profile.clone(), sink)?;
        }
        None => sink.warn(&format!("Unknown profile: {answer}")),
    }
    Ok(())
}
