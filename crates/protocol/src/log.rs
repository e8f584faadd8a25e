//! Tagged log lines shown to the user.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Severity tag of a user-facing log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// A step completed.
    Ok,
    /// Something was not found or failed; the pipeline carries on.
    Warn,
    /// Progress note.
    Info,
}

impl LogLevel {
    /// Leading marker used when a line is rendered as text.
    pub fn marker(&self) -> &'static str {
        match self {
            LogLevel::Ok => "[OK]",
            LogLevel::Warn => "[!]",
            LogLevel::Info => "[~]",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Ok => write!(f, "ok"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Info => write!(f, "info"),
        }
    }
}

/// One line of user-facing output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogLine {
    pub level: LogLevel,
    pub message: String,
}

impl LogLine {
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }

    pub fn ok(message: impl Into<String>) -> Self {
        Self::new(LogLevel::Ok, message)
    }

    pub fn warn(message: impl Into<String>) -> Self {
        Self::new(LogLevel::Warn, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(LogLevel::Info, message)
    }

    /// Parses a rendered line back, inferring the level from its leading marker.
    ///
    /// Leading whitespace is ignored. Lines without a known marker are `Info`.
    pub fn parse(text: &str) -> Self {
        let trimmed = text.trim_start();
        for level in [LogLevel::Ok, LogLevel::Warn, LogLevel::Info] {
            if let Some(rest) = trimmed.strip_prefix(level.marker()) {
                return Self::new(level, rest.trim_start());
            }
        }
        Self::info(trimmed)
    }
}

impl fmt::Display for LogLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.level.marker(), self.message)
    }
}
