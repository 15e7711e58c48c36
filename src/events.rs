//! Leveled log events and the sinks that consume them.
//!
//! The runner does not talk to a global logger. It emits [`LogEvent`]s
//! into an [`EventSink`] it owns, so embedders route events wherever they
//! want and tests install a [`CaptureSink`] without touching process-wide
//! state.

use std::collections::BTreeMap;
use std::sync::Mutex;
use std::time::Duration;

/// Severity of a log event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Invocation start.
    Info,
    /// Captured output.
    Debug,
    /// Execution failure.
    Error,
}

/// A structured field value attached to an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// Free-form text.
    Text(String),
    /// Measured elapsed time.
    Duration(Duration),
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<Duration> for FieldValue {
    fn from(value: Duration) -> Self {
        FieldValue::Duration(value)
    }
}

/// One leveled event with a message and structured fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEvent {
    /// Event severity.
    pub level: LogLevel,
    /// Message text.
    pub message: String,
    /// Structured fields, ordered by name.
    pub fields: BTreeMap<&'static str, FieldValue>,
}

impl LogEvent {
    fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Create an info-level event.
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(LogLevel::Info, message)
    }

    /// Create a debug-level event.
    pub fn debug(message: impl Into<String>) -> Self {
        Self::new(LogLevel::Debug, message)
    }

    /// Create an error-level event.
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(LogLevel::Error, message)
    }

    /// Attach a structured field.
    pub fn with_field(mut self, name: &'static str, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(name, value.into());
        self
    }

    /// Look up a field by name.
    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }
}

/// Destination for runner events.
///
/// Sinks may be shared across concurrent invocations and must tolerate
/// concurrent `emit` calls.
pub trait EventSink: Send + Sync {
    /// Consume one event.
    fn emit(&self, event: LogEvent);
}

/// Production sink that forwards events to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&self, event: LogEvent) {
        match event.level {
            LogLevel::Info => tracing::info!(fields = ?event.fields, "{}", event.message),
            LogLevel::Debug => tracing::debug!(fields = ?event.fields, "{}", event.message),
            LogLevel::Error => tracing::error!(fields = ?event.fields, "{}", event.message),
        }
    }
}

/// Sink that records every event for later inspection.
///
/// Intended for tests asserting on the exact event sequence of a run, but
/// usable by any embedder that wants to buffer events.
#[derive(Debug, Default)]
pub struct CaptureSink {
    events: Mutex<Vec<LogEvent>>,
}

impl CaptureSink {
    /// Create an empty capture sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events recorded so far, in emission order.
    pub fn events(&self) -> Vec<LogEvent> {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Discard all recorded events.
    pub fn clear(&self) {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clear();
    }
}

impl EventSink for CaptureSink {
    fn emit(&self, event: LogEvent) {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(event);
    }
}
