//! Logging port injected into every stage of a cleanup run
//!
//! Stages never reach for a global logger; they receive a [`LogSink`] and
//! report through it. The binary wires in [`TracingSink`], tests use
//! [`MemorySink`] to assert on what was reported.

use std::sync::Mutex;

/// Severity of a reported message
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Debug,
    Info,
    Warn,
    Error,
}

/// Sink for messages emitted during a cleanup run
pub trait LogSink: Send + Sync {
    fn debug(&self, message: &str);

    fn info(&self, message: &str);

    fn warn(&self, message: &str);

    fn error(&self, message: &str);

    /// Dispatch on a runtime level
    fn log(&self, level: Level, message: &str) {
        match level {
            Level::Debug => self.debug(message),
            Level::Info => self.info(message),
            Level::Warn => self.warn(message),
            Level::Error => self.error(message),
        }
    }
}

/// A sink that drops everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpSink;

impl LogSink for NoOpSink {
    fn debug(&self, _message: &str) {}

    fn info(&self, _message: &str) {}

    fn warn(&self, _message: &str) {}

    fn error(&self, _message: &str) {}
}

/// A sink that forwards to the `tracing` crate
///
/// Every event carries a `component` field naming the stage that emitted it.
#[derive(Debug, Clone)]
pub struct TracingSink {
    component: String,
}

impl TracingSink {
    /// Create a new tracing sink for the named component
    pub fn new(component: impl Into<String>) -> Self {
        Self {
            component: component.into(),
        }
    }

    /// Get the component name
    pub fn component(&self) -> &str {
        &self.component
    }
}

impl Default for TracingSink {
    fn default() -> Self {
        Self::new("cleanup")
    }
}

impl LogSink for TracingSink {
    fn debug(&self, message: &str) {
        tracing::debug!(component = %self.component, "{}", message);
    }

    fn info(&self, message: &str) {
        tracing::info!(component = %self.component, "{}", message);
    }

    fn warn(&self, message: &str) {
        tracing::warn!(component = %self.component, "{}", message);
    }

    fn error(&self, message: &str) {
        tracing::error!(component = %self.component, "{}", message);
    }
}

/// A sink that records every message in memory
///
/// Useful for testing.
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<(Level, String)>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far
    pub fn records(&self) -> Vec<(Level, String)> {
        self.lock().clone()
    }

    /// Messages recorded at exactly `level`
    pub fn messages_at(&self, level: Level) -> Vec<String> {
        self.lock()
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m.clone())
            .collect()
    }

    /// Whether any message at `level` contains `needle`
    pub fn contains(&self, level: Level, needle: &str) -> bool {
        self.lock()
            .iter()
            .any(|(l, m)| *l == level && m.contains(needle))
    }

    fn push(&self, level: Level, message: &str) {
        self.lock().push((level, message.to_string()));
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<(Level, String)>> {
        // A poisoned log is still readable
        self.records.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl LogSink for MemorySink {
    fn debug(&self, message: &str) {
        self.push(Level::Debug, message);
    }

    fn info(&self, message: &str) {
        self.push(Level::Info, message);
    }

    fn warn(&self, message: &str) {
        self.push(Level::Warn, message);
    }

    fn error(&self, message: &str) {
        self.push(Level::Error, message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_sink_records_levels() {
        let sink = MemorySink::new();
        sink.info("fetched 3 components");
        sink.warn("delete failed");
        sink.log(Level::Error, "halting");

        assert_eq!(sink.records().len(), 3);
        assert_eq!(sink.messages_at(Level::Warn), vec!["delete failed"]);
        assert!(sink.contains(Level::Error, "halt"));
        assert!(!sink.contains(Level::Debug, "halt"));
    }

    #[test]
    fn test_tracing_sink_component() {
        assert_eq!(TracingSink::default().component(), "cleanup");
        let sink = TracingSink::new("inventory");
        assert_eq!(sink.component(), "inventory");
        // Must not panic without a subscriber installed
        sink.info("no subscriber");
    }
}
