//! Shared vocabulary for cfgdeploy.
//!
//! The detection and install pipeline never talks to a presentation layer
//! directly. It describes what happened as [`Event`]s and hands them to an
//! [`EventSink`] supplied by the caller (console, GUI bridge, test queue).

pub mod category;
pub mod events;
pub mod log;
pub mod sink;

// Re-export primary types.
pub use category::{Category, CategorySet};
pub use events::Event;
pub use log::{LogLevel, LogLine};
pub use sink::{ChannelSink, EventQueue, EventSink, NoopSink, TracingSink};
