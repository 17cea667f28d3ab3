#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Audit logging for vigil
//!
//! Every status message produced by a check goes through an [`AuditSink`].
//! The production sink is [`Logger`], which echoes to standard output and
//! appends to the run's log file; [`MemorySink`] keeps records in memory so
//! checkers can be tested without touching the filesystem.
//!
//! Sinks are constructed explicitly and handed to each checker; there is no
//! process-wide logging state in this crate. Records are also mirrored as
//! `tracing` events under the `vigil::audit` target.

pub mod logger;
pub mod meta;

pub use logger::{Logger, MemorySink};
pub use meta::{LogRecord, Severity};

/// Destination for audit records
pub trait AuditSink: Send + Sync {
    /// Record a single status message
    fn record(&self, message: &str, severity: Severity);

    /// Record an informational message
    fn info(&self, message: &str) {
        self.record(message, Severity::Info);
    }

    /// Record an error message
    fn error(&self, message: &str) {
        self.record(message, Severity::Error);
    }
}

/// Mirror an audit record into the tracing pipeline.
pub(crate) fn trace_record(message: &str, severity: Severity) {
    match severity {
        Severity::Info => tracing::info!(target: "vigil::audit", "{message}"),
        Severity::Error => tracing::error!(target: "vigil::audit", "{message}"),
    }
}
