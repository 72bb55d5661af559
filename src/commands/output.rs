//! Transport-agnostic output sinks.
//!
//! Handlers and the prompt engine write whole lines to an [`OutputSink`]. The
//! console forwards them over a channel, script mode prints them, and tests
//! collect them in a [`BufferSink`].

use std::sync::{Arc, Mutex};

use tokio::sync::mpsc::UnboundedSender;

/// Destination for interpreter output, one line at a time.
pub trait OutputSink: Send + Sync {
    /// Writes one line. Embedded newlines are kept as-is.
    fn writeln(&mut self, line: &str);

    /// Writes every line of a multi-line block.
    fn write_block(&mut self, text: &str) {
        for line in text.lines() {
            self.writeln(line);
        }
    }

    /// Writes an error line with the standard prefix.
    fn error(&mut self, message: &str) {
        self.writeln(&format!("Error: {}", message));
    }
}

/// Collects lines in memory. Clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct BufferSink {
    lines: Arc<Mutex<Vec<String>>>,
}

impl BufferSink {
    /// Creates an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of every line written so far.
    pub fn lines(&self) -> Vec<String> {
        match self.lines.lock() {
            Ok(lines) => lines.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Returns everything written so far joined with newlines.
    pub fn text(&self) -> String {
        self.lines().join("\n")
    }

    /// Drops every collected line.
    pub fn clear(&self) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.clear();
        }
    }
}

impl OutputSink for BufferSink {
    fn writeln(&mut self, line: &str) {
        match self.lines.lock() {
            Ok(mut lines) => lines.push(line.to_string()),
            Err(poisoned) => poisoned.into_inner().push(line.to_string()),
        }
    }
}

/// Sends lines to the console's render loop.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: UnboundedSender<String>,
}

impl ChannelSink {
    pub fn new(tx: UnboundedSender<String>) -> Self {
        Self { tx }
    }
}

impl OutputSink for ChannelSink {
    fn writeln(&mut self, line: &str) {
        if self.tx.send(line.to_string()).is_err() {
            tracing::debug!("Output channel closed, dropping line");
        }
    }
}

/// Prints lines to standard output.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutSink;

impl OutputSink for StdoutSink {
    fn writeln(&mut self, line: &str) {
        println!("{}", line);
    }
}
