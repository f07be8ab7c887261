//! Operator-facing progress output
//!
//! The lines below are what an operator watches for. `SUCCEEDED` is the one
//! signal that a test passed.

use std::sync::Mutex;

/// Printed before a connection attempt
pub const CONNECTING: &str = "Connecting ...";
/// Printed once a connection handle exists
pub const CONNECTED: &str = "connected";
/// Printed before the status command
pub const TESTING_COMMANDS: &str = "testing commands ...";
/// Printed when the status command succeeds
pub const SUCCEEDED: &str = "Done. Test succeeded.";
/// Label preceding a status command error
pub const ERROR_LABEL: &str = "Error";

/// Sink for progress lines
pub trait Reporter: Send + Sync {
    /// Append a progress line
    fn line(&self, message: &str);

    /// Append a labelled error
    fn error(&self, label: &str, error: &dyn std::error::Error) {
        self.line(&format!("{} {}", label, error));
    }
}

/// Writes progress lines to stdout
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn line(&self, message: &str) {
        println!("{}", message);
    }
}

/// Keeps progress lines in memory
#[derive(Debug, Default)]
pub struct MemoryReporter {
    lines: Mutex<Vec<String>>,
}

impl MemoryReporter {
    /// Create an empty reporter
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines recorded so far
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .map(|lines| lines.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    /// Whether a line equal to `message` was recorded
    pub fn contains(&self, message: &str) -> bool {
        self.lines().iter().any(|l| l == message)
    }

    /// Drop all recorded lines
    pub fn clear(&self) {
        match self.lines.lock() {
            Ok(mut lines) => lines.clear(),
            Err(poisoned) => poisoned.into_inner().clear(),
        }
    }
}

impl Reporter for MemoryReporter {
    fn line(&self, message: &str) {
        match self.lines.lock() {
            Ok(mut lines) => lines.push(message.to_string()),
            Err(poisoned) => poisoned.into_inner().push(message.to_string()),
        }
    }
}

impl<R: Reporter + ?Sized> Reporter for &R {
    fn line(&self, message: &str) {
        (**self).line(message)
    }

    fn error(&self, label: &str, error: &dyn std::error::Error) {
        (**self).error(label, error)
    }
}

impl<R: Reporter + ?Sized> Reporter for std::sync::Arc<R> {
    fn line(&self, message: &str) {
        (**self).line(message)
    }

    fn error(&self, label: &str, error: &dyn std::error::Error) {
        (**self).error(label, error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_reporter_records_in_order() {
        let reporter = MemoryReporter::new();
        reporter.line(CONNECTING);
        reporter.line(CONNECTED);
        assert_eq!(reporter.lines(), vec![CONNECTING, CONNECTED]);
        assert!(reporter.contains(CONNECTED));
        assert!(!reporter.contains(SUCCEEDED));
    }

    #[test]
    fn test_error_line_format() {
        let reporter = MemoryReporter::new();
        let err = std::io::Error::new(std::io::ErrorKind::Other, "boom");
        reporter.error(ERROR_LABEL, &err);
        assert_eq!(reporter.lines(), vec!["Error boom"]);
    }

    #[test]
    fn test_clear() {
        let reporter = MemoryReporter::new();
        reporter.line("x");
        reporter.clear();
        assert!(reporter.lines().is_empty());
    }

    #[test]
    fn test_reporter_through_arc() {
        let reporter = std::sync::Arc::new(MemoryReporter::new());
        let shared = reporter.clone();
        shared.line(SUCCEEDED);
        assert!(reporter.contains(SUCCEEDED));
    }
}
