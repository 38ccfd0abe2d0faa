//! Observable ledger events
//!
//! Every line the logger writes names one of these.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Lifecycle
    /// Process startup begins
    BootStart,
    /// Ledger loaded and ready
    BootComplete,
    /// Configuration loaded and validated
    ConfigLoaded,
    /// Data directory initialized
    LedgerInitialized,
    /// Input exhausted, shutting down
    Shutdown,

    // Snapshots
    /// Snapshot written to disk
    SnapshotWritten,
    /// Snapshot loaded from disk
    SnapshotLoaded,
    /// Snapshot failed integrity checks (FATAL)
    SnapshotCorrupt,

    // Record operations
    RecordCreated,
    RecordModified,
    DescriptorsAppended,
    OwnershipTransferred,
    RecordDeleted,
    AccessGranted,
    AccessRevoked,
    AuthenticityVerified,
    EmergencyRestriction,

    // Requests
    /// Operation refused with a registry error
    OperationRejected,
    /// Request could not be parsed
    RequestInvalid,
}

impl Event {
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::BootStart => "AGROLEDGER_STARTUP_BEGIN",
            Event::BootComplete => "AGROLEDGER_STARTUP_COMPLETE",
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::LedgerInitialized => "LEDGER_INITIALIZED",
            Event::Shutdown => "SHUTDOWN",

            Event::SnapshotWritten => "SNAPSHOT_WRITTEN",
            Event::SnapshotLoaded => "SNAPSHOT_LOADED",
            Event::SnapshotCorrupt => "SNAPSHOT_CORRUPT",

            Event::RecordCreated => "RECORD_CREATED",
            Event::RecordModified => "RECORD_MODIFIED",
            Event::DescriptorsAppended => "DESCRIPTORS_APPENDED",
            Event::OwnershipTransferred => "OWNERSHIP_TRANSFERRED",
            Event::RecordDeleted => "RECORD_DELETED",
            Event::AccessGranted => "ACCESS_GRANTED",
            Event::AccessRevoked => "ACCESS_REVOKED",
            Event::AuthenticityVerified => "AUTHENTICITY_VERIFIED",
            Event::EmergencyRestriction => "EMERGENCY_RESTRICTION",

            Event::OperationRejected => "OPERATION_REJECTED",
            Event::RequestInvalid => "REQUEST_INVALID",
        }
    }

    /// Whether this event precedes process termination
    pub fn is_fatal(&self) -> bool {
        matches!(self, Event::SnapshotCorrupt)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names() {
        assert_eq!(Event::RecordCreated.as_str(), "RECORD_CREATED");
        assert_eq!(Event::OperationRejected.to_string(), "OPERATION_REJECTED");
    }

    #[test]
    fn test_only_corruption_is_fatal() {
        assert!(Event::SnapshotCorrupt.is_fatal());
        assert!(!Event::RecordDeleted.is_fatal());
        assert!(!Event::OperationRejected.is_fatal());
    }
}
