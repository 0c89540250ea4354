//! Diagnostic message sinks.
//!
//! Components report informational messages, warnings and errors through a
//! [`Diagnostics`] sink passed in by the caller, never through the primary
//! output stream. The default sink forwards to `tracing`, whose subscriber
//! writes to stderr; tests capture messages with [`MemoryDiagnostics`].

use std::cell::RefCell;
use std::fmt;
use tracing::{error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Severity::Info => "Info",
            Severity::Warning => "Warning",
            Severity::Error => "Error",
        };
        f.write_str(label)
    }
}

pub trait Diagnostics {
    fn emit(&self, severity: Severity, message: &str);

    fn info(&self, message: &str) {
        self.emit(Severity::Info, message);
    }

    fn warning(&self, message: &str) {
        self.emit(Severity::Warning, message);
    }

    fn error(&self, message: &str) {
        self.emit(Severity::Error, message);
    }
}

/// Forwards diagnostics to the global `tracing` subscriber.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn emit(&self, severity: Severity, message: &str) {
        match severity {
            Severity::Info => info!("{}", message),
            Severity::Warning => warn!("{}", message),
            Severity::Error => error!("{}", message),
        }
    }
}

/// Records diagnostics in memory.
#[derive(Debug, Default)]
pub struct MemoryDiagnostics {
    records: RefCell<Vec<(Severity, String)>>,
}

impl MemoryDiagnostics {
    pub fn records(&self) -> Vec<(Severity, String)> {
        self.records.borrow().clone()
    }

    /// Messages of one severity, in emission order.
    pub fn messages(&self, severity: Severity) -> Vec<String> {
        self.records
            .borrow()
            .iter()
            .filter(|(s, _)| *s == severity)
            .map(|(_, m)| m.clone())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.records.borrow().is_empty()
    }
}

impl Diagnostics for MemoryDiagnostics {
    fn emit(&self, severity: Severity, message: &str) {
        self.records.borrow_mut().push((severity, message.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_sink_keeps_order_and_severity() {
        let sink = MemoryDiagnostics::default();
        sink.info("loaded image");
        sink.warning("no secondary directory");
        sink.error("directory 3 not found");
        assert_eq!(
            sink.records(),
            vec![
                (Severity::Info, "loaded image".to_string()),
                (Severity::Warning, "no secondary directory".to_string()),
                (Severity::Error, "directory 3 not found".to_string()),
            ]
        );
        assert_eq!(sink.messages(Severity::Warning), vec!["no secondary directory"]);
    }

    #[test]
    fn tracing_sink_accepts_all_levels() {
        let sink = TracingDiagnostics;
        sink.info("info");
        sink.warning("warning");
        sink.error("error");
    }

    #[test]
    fn severity_labels() {
        assert_eq!(Severity::Warning.to_string(), "Warning");
    }
}
