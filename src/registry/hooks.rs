//! Lifecycle hooks
//!
//! Two behaviors have no persisted effect:
//! deleting a record does not remove its viewer grants, and an emergency
//! restriction only checks authorization. A `RecordHooks` implementation
//! is notified at both points so the intended behavior can be attached
//! later without changing the operations themselves.
//!
//! Hooks run after the ledger lock is released and see a copy of the
//! record. A panicking hook cannot poison ledger state.

use super::record::{Identity, ProductionRecord};

/// Observer for record lifecycle points with no built-in effect
pub trait RecordHooks: Send + Sync {
    /// Called after a record is removed. `stale_viewers` are the grants
    /// still addressable for the deleted id.
    fn on_record_deleted(&self, _record: &ProductionRecord, _stale_viewers: &[Identity]) {}

    /// Called after an emergency restriction passes authorization.
    fn on_emergency_restriction(&self, _record: &ProductionRecord, _caller: &Identity) {}
}

/// Default hooks: do nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopHooks;

impl RecordHooks for NoopHooks {}
