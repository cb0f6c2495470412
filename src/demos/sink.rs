//! Log sinks the demos write their output to.
//!
//! Demos never log directly. They receive a [`LogSink`] and emit INFO lines
//! for values and completion and ERROR lines for failures. The binary uses
//! [`TracingSink`]; tests use [`MemorySink`] and assert on the captured lines.

use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use tracing::{error, info};

/// Severity of one demo log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
  /// Values and completion notices.
  Info,
  /// Failures.
  Error,
}

impl fmt::Display for Severity {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Severity::Info => write!(f, "INFO"),
      Severity::Error => write!(f, "ERROR"),
    }
  }
}

/// Destination of demo output.
pub trait LogSink: Send + Sync {
  /// Records one line.
  fn log(&self, severity: Severity, line: &str);

  /// Records one INFO line.
  fn info(&self, line: &str) {
    self.log(Severity::Info, line);
  }

  /// Records one ERROR line.
  fn error(&self, line: &str) {
    self.log(Severity::Error, line);
  }
}

/// Forwards lines to `tracing` events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
  fn log(&self, severity: Severity, line: &str) {
    match severity {
      Severity::Info => info!(target: "reactive_primer::demo", "{line}"),
      Severity::Error => error!(target: "reactive_primer::demo", "{line}"),
    }
  }
}

/// Keeps every line in memory. Clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
  lines: Arc<Mutex<Vec<(Severity, String)>>>,
}

impl MemorySink {
  /// Creates an empty sink.
  pub fn new() -> Self {
    Self::default()
  }

  /// Every line recorded so far, with its severity.
  pub fn lines(&self) -> Vec<(Severity, String)> {
    self.lines.lock().clone()
  }

  /// The text of every line recorded so far.
  pub fn messages(&self) -> Vec<String> {
    self.lines.lock().iter().map(|(_, line)| line.clone()).collect()
  }
}

impl LogSink for MemorySink {
  fn log(&self, severity: Severity, line: &str) {
    self.lines.lock().push((severity, line.to_string()));
  }
}
