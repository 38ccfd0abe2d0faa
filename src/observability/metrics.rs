//! Ledger counters
//!
//! Counters only, monotonic except `live_records`. Reset on process start.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Operational counters, updated by the ledger after each operation
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    records_created: AtomicU64,
    records_modified: AtomicU64,
    descriptors_appended: AtomicU64,
    ownership_transfers: AtomicU64,
    records_deleted: AtomicU64,
    grants_issued: AtomicU64,
    grants_revoked: AtomicU64,
    verifications: AtomicU64,
    emergency_restrictions: AtomicU64,
    operations_rejected: AtomicU64,
    live_records: AtomicU64,
}

impl MetricsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_created(&self) {
        self.records_created.fetch_add(1, Ordering::Relaxed);
        self.live_records.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_modified(&self) {
        self.records_modified.fetch_add(1, Ordering::Relaxed);
    }

    pub fn descriptors_appended(&self) {
        self.descriptors_appended.fetch_add(1, Ordering::Relaxed);
    }

    pub fn ownership_transferred(&self) {
        self.ownership_transfers.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_deleted(&self) {
        self.records_deleted.fetch_add(1, Ordering::Relaxed);
        // Saturate rather than wrap if out of sync with a restored ledger
        let _ = self
            .live_records
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| Some(n.saturating_sub(1)));
    }

    pub fn grant_issued(&self) {
        self.grants_issued.fetch_add(1, Ordering::Relaxed);
    }

    pub fn grant_revoked(&self) {
        self.grants_revoked.fetch_add(1, Ordering::Relaxed);
    }

    pub fn verification(&self) {
        self.verifications.fetch_add(1, Ordering::Relaxed);
    }

    pub fn emergency_restriction(&self) {
        self.emergency_restrictions.fetch_add(1, Ordering::Relaxed);
    }

    pub fn operation_rejected(&self) {
        self.operations_rejected.fetch_add(1, Ordering::Relaxed);
    }

    /// Sets the live record gauge, used after loading a snapshot
    pub fn set_live_records(&self, count: u64) {
        self.live_records.store(count, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            records_created: self.records_created.load(Ordering::Relaxed),
            records_modified: self.records_modified.load(Ordering::Relaxed),
            descriptors_appended: self.descriptors_appended.load(Ordering::Relaxed),
            ownership_transfers: self.ownership_transfers.load(Ordering::Relaxed),
            records_deleted: self.records_deleted.load(Ordering::Relaxed),
            grants_issued: self.grants_issued.load(Ordering::Relaxed),
            grants_revoked: self.grants_revoked.load(Ordering::Relaxed),
            verifications: self.verifications.load(Ordering::Relaxed),
            emergency_restrictions: self.emergency_restrictions.load(Ordering::Relaxed),
            operations_rejected: self.operations_rejected.load(Ordering::Relaxed),
            live_records: self.live_records.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of every counter
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub records_created: u64,
    pub records_modified: u64,
    pub descriptors_appended: u64,
    pub ownership_transfers: u64,
    pub records_deleted: u64,
    pub grants_issued: u64,
    pub grants_revoked: u64,
    pub verifications: u64,
    pub emergency_restrictions: u64,
    pub operations_rejected: u64,
    pub live_records: u64,
}
