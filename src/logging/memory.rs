//! In-memory logger.
use std::sync::Mutex;

use super::types::Log;

/// Severity of a captured message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    /// Stage header.
    Stage,
    /// Informational line.
    Info,
    /// Success line.
    Success,
    /// Debug line.
    Debug,
    /// Warning.
    Warn,
    /// Error.
    Error,
    /// Dry-run preview.
    DryRun,
}

/// A [`Log`] that keeps every message in order instead of printing it.
///
/// Used wherever output must be inspected after the fact, most notably by
/// the unit and integration tests of the link engine.
#[derive(Debug, Default)]
pub struct MemoryLog {
    entries: Mutex<Vec<(Level, String)>>,
}

impl MemoryLog {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All captured messages, oldest first.
    #[must_use]
    pub fn entries(&self) -> Vec<(Level, String)> {
        self.entries
            .lock()
            .map_or_else(|_| Vec::new(), |guard| guard.clone())
    }

    /// Captured messages of one level, oldest first.
    #[must_use]
    pub fn messages(&self, level: Level) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, msg)| msg)
            .collect()
    }

    /// Return `true` if any message of `level` contains `needle`.
    #[must_use]
    pub fn contains(&self, level: Level, needle: &str) -> bool {
        self.messages(level).iter().any(|m| m.contains(needle))
    }

    fn push(&self, level: Level, msg: &str) {
        if let Ok(mut guard) = self.entries.lock() {
            guard.push((level, msg.to_string()));
        }
    }
}

impl Log for MemoryLog {
    fn stage(&self, msg: &str) {
        self.push(Level::Stage, msg);
    }

    fn info(&self, msg: &str) {
        self.push(Level::Info, msg);
    }

    fn success(&self, msg: &str) {
        self.push(Level::Success, msg);
    }

    fn debug(&self, msg: &str) {
        self.push(Level::Debug, msg);
    }

    fn warn(&self, msg: &str) {
        self.push(Level::Warn, msg);
    }

    fn error(&self, msg: &str) {
        self.push(Level::Error, msg);
    }

    fn dry_run(&self, msg: &str) {
        self.push(Level::DryRun, msg);
    }
}
