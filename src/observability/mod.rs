//! Observability subsystem
//!
//! - Structured JSON logging
//! - Operation counters
//! - Operation audit trail
//!
//! Observability is read-only: nothing here can change the outcome of a
//! ledger operation.

mod events;
mod logger;
mod metrics;
pub mod audit;

pub use audit::{AuditLog, AuditOutcome, AuditRecord, FileAuditLog, MemoryAuditLog};
pub use events::Event;
pub use logger::{Logger, Severity};
pub use metrics::{MetricsRegistry, MetricsSnapshot};

/// Log a lifecycle event, FATAL if the event is fatal
pub fn log_event(event: Event, fields: &[(&str, &str)]) {
    let severity = if event.is_fatal() {
        Severity::Fatal
    } else {
        Severity::Info
    };
    Logger::log(severity, event, fields);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_event_does_not_panic() {
        log_event(Event::BootStart, &[]);
        log_event(Event::ConfigLoaded, &[("data_dir", "/tmp/agro")]);
    }
}
