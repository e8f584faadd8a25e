use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::log::LogLine;

/// Something a front-end may want to display.
///
/// Change notifications are only emitted when the value actually changed.
/// Cfg changes carry the derived backup path so bound display fields never
/// have to recompute it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Event {
    /// A user-facing log line.
    Log(LogLine),
    /// The installation root was detected, replaced or lost.
    #[serde(rename_all = "camelCase")]
    RootChanged { path: Option<PathBuf> },
    /// The global cfg directory changed.
    #[serde(rename_all = "camelCase")]
    GlobalCfgChanged {
        path: Option<PathBuf>,
        backup_path: Option<PathBuf>,
    },
    /// A different profile was selected.
    #[serde(rename_all = "camelCase")]
    ProfileChanged { profile: Option<String> },
    /// The per-user cfg directory changed.
    #[serde(rename_all = "camelCase")]
    UserCfgChanged {
        path: Option<PathBuf>,
        backup_path: Option<PathBuf>,
    },
}

impl Event {
    /// Returns the log line if this is a `Log` event.
    pub fn as_log(&self) -> Option<&LogLine> {
        match self {
            Event::Log(line) => Some(line),
            _ => None,
        }
    }

    /// Returns true for the change notifications (everything but `Log`).
    pub fn is_change(&self) -> bool {
        !matches!(self, Event::Log(_))
    }
}

impl From<LogLine> for Event {
    fn from(line: LogLine) -> Self {
        Event::Log(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_json_tagging() {
        let event = Event::UserCfgChanged {
            path: Some(PathBuf::from("/u/cfg")),
            backup_path: Some(PathBuf::from("/u/user_cfg_backup.zip")),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"userCfgChanged\""));
        assert!(json.contains("\"backupPath\""));

        let parsed: Event = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, event);
    }

    #[test]
    fn log_accessors() {
        let event: Event = LogLine::ok("x").into();
        assert_eq!(event.as_log(), Some(&LogLine::ok("x")));
        assert!(!event.is_change());
        assert!(Event::RootChanged { path: None }.is_change());
    }
}
