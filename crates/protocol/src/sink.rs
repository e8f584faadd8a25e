//! Event sinks.
//!
//! The pipeline only ever holds a `&dyn EventSink`. Front-ends pick the
//! transport: a queue they drain, a Tokio channel, or plain `tracing` output.

use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;

use crate::events::Event;
use crate::log::{LogLevel, LogLine};

/// Receives events produced by the pipeline.
///
/// Implementations must not block; the pipeline emits from whatever thread
/// runs the install call.
pub trait EventSink: Send + Sync {
    /// Delivers one event.
    fn emit(&self, event: Event);

    /// Emits a log line with the given level.
    fn log(&self, level: LogLevel, message: &str) {
        self.emit(Event::Log(LogLine::new(level, message)));
    }

    fn ok(&self, message: &str) {
        self.log(LogLevel::Ok, message);
    }

    fn warn(&self, message: &str) {
        self.log(LogLevel::Warn, message);
    }

    fn info(&self, message: &str) {
        self.log(LogLevel::Info, message);
    }
}

impl<S: EventSink + ?Sized> EventSink for Arc<S> {
    fn emit(&self, event: Event) {
        (**self).emit(event);
    }
}

impl<S: EventSink + ?Sized> EventSink for &S {
    fn emit(&self, event: Event) {
        (**self).emit(event);
    }
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl EventSink for NoopSink {
    fn emit(&self, _event: Event) {}
}

/// Buffers events until the caller drains them.
#[derive(Debug, Default)]
pub struct EventQueue {
    events: Mutex<Vec<Event>>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes and returns every buffered event in emission order.
    pub fn drain(&self) -> Vec<Event> {
        match self.events.lock() {
            Ok(mut events) => std::mem::take(&mut *events),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }

    /// Number of buffered events.
    pub fn len(&self) -> usize {
        self.events.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl EventSink for EventQueue {
    fn emit(&self, event: Event) {
        match self.events.lock() {
            Ok(mut events) => events.push(event),
            Err(poisoned) => poisoned.into_inner().push(event),
        }
    }
}

/// Forwards events into an unbounded Tokio channel.
///
/// Events emitted after the receiver is dropped are discarded.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<Event>,
}

impl ChannelSink {
    /// Creates a sink and the receiver that observes it.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Event>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl EventSink for ChannelSink {
    fn emit(&self, event: Event) {
        let _ = self.tx.send(event);
    }
}

/// Mirrors events into `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&self, event: Event) {
        match event {
            Event::Log(line) => match line.level {
                LogLevel::Warn => tracing::warn!("{}", line.message),
                LogLevel::Ok | LogLevel::Info => tracing::info!("{}", line.message),
            },
            other => tracing::debug!(event = ?other, "state changed"),
        }
    }
}
