//! Log sink.
//!
//! The presentation layer hands the engine a sink for player-facing log
//! lines. The engine never reads anything back from it.

/// Receives player-facing log lines.
pub trait LogSink {
    fn add_log(&mut self, message: &str);
}

/// Discards every message.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullLog;

impl LogSink for NullLog {
    fn add_log(&mut self, _message: &str) {}
}

/// Keeps every message in memory.
#[derive(Clone, Debug, Default)]
pub struct MemoryLog {
    pub lines: Vec<String>,
}

impl MemoryLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether any line contains `needle`.
    #[must_use]
    pub fn contains(&self, needle: &str) -> bool {
        self.lines.iter().any(|l| l.contains(needle))
    }
}

impl LogSink for MemoryLog {
    fn add_log(&mut self, message: &str) {
        self.lines.push(message.to_owned());
    }
}

/// Forwards every message to `tracing` at info level.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingLog;

impl LogSink for TracingLog {
    fn add_log(&mut self, message: &str) {
        tracing::info!(target: "avatar_ccg::log", "{message}");
    }
}

impl<F: FnMut(&str)> LogSink for F {
    fn add_log(&mut self, message: &str) {
        self(message);
    }
}
