//! Console output sinks.
//!
//! Walks report two kinds of lines while they run: per-entry progress lines
//! (recursive mode) and diagnostics for entries that could not be read.
//! Both go through an [`OutputSink`] so the same walker can print to the
//! terminal or record into memory.

use std::{
    fmt,
    path::Path,
    sync::{Mutex, PoisonError},
};

use colored::Colorize;

/// Destination for lines produced during a walk.
///
/// Implementations are called concurrently from walker threads and from the
/// progress tasks spawned by each walk.
pub trait OutputSink: Send + Sync + fmt::Debug {
    /// Report the individual size of one visited entry.
    fn progress(&self, path: &Path, size: &str);

    /// Report a non-fatal traversal problem.
    fn diagnostic(&self, message: &str);
}

/// Writes every line straight to standard output.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutSink;

impl OutputSink for StdoutSink {
    fn progress(&self, path: &Path, size: &str) {
        println!("{}: {size}", path.display());
    }

    fn diagnostic(&self, message: &str) {
        println!("{}", message.red());
    }
}

/// Records lines in memory, in the order they were emitted.
#[derive(Debug, Default)]
pub struct BufferSink {
    lines: Mutex<Vec<String>>,
}

impl BufferSink {
    /// Create an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every line recorded so far.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// All recorded lines joined with newlines.
    #[must_use]
    pub fn contents(&self) -> String {
        self.lines().join("\n")
    }

    fn push(&self, line: String) {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(line);
    }
}

impl OutputSink for BufferSink {
    fn progress(&self, path: &Path, size: &str) {
        self.push(format!("{}: {size}", path.display()));
    }

    fn diagnostic(&self, message: &str) {
        self.push(message.to_string());
    }
}
