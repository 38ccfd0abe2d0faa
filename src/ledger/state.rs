//! Durable ledger state
//!
//! The whole persisted state is a triple: the record table, the grant
//! table and the id counter. `StateImage` is that triple in plain data
//! form, the unit every snapshot reads and writes.

use serde::{Deserialize, Serialize};

use crate::registry::{AccessGrant, AccessMatrix, ProductionRecord, RecordId, RecordStore};

/// Plain-data form of the durable state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateImage {
    /// Highest record id ever issued
    pub last_id: RecordId,
    /// Live records in id order
    pub records: Vec<ProductionRecord>,
    /// Viewer grants in (record, viewer) order, including stale ones
    pub grants: Vec<AccessGrant>,
}

impl StateImage {
    /// Newest `created_at` among live records, 0 when empty
    pub fn latest_created_at(&self) -> u64 {
        self.records.iter().map(|r| r.created_at).max().unwrap_or(0)
    }
}

/// Mutable state guarded by the ledger lock
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct LedgerState {
    pub(crate) store: RecordStore,
    pub(crate) access: AccessMatrix,
}

impl LedgerState {
    pub(crate) fn image(&self) -> StateImage {
        StateImage {
            last_id: self.store.last_issued_id(),
            records: self.store.records().cloned().collect(),
            grants: self.access.grants(),
        }
    }

    /// Rebuilds state from an image that has already been checked.
    pub(crate) fn from_image(image: StateImage) -> Self {
        Self {
            store: RecordStore::from_parts(image.records, image.last_id),
            access: AccessMatrix::from_grants(image.grants),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{Identity, RecordFields};

    #[test]
    fn test_image_captures_the_triple() {
        let mut state = LedgerState::default();
        let owner = Identity::from("p1");
        let fields = RecordFields::new("Oats", 40, "Lower field", vec!["wet".into()]);

        let first = state.store.create(fields.clone(), &owner, 1).unwrap();
        state.access.grant_owner_default(first, &owner);
        let second = state.store.create(fields, &owner, 2).unwrap();
        state.access.grant_owner_default(second, &owner);
        state.store.delete(first, &owner).unwrap();

        let image = state.image();
        assert_eq!(image.last_id, 2);
        assert_eq!(image.records.len(), 1);
        // Grant for the deleted record is still there
        assert_eq!(image.grants.len(), 2);

        assert_eq!(image.latest_created_at(), 2);
        assert_eq!(StateImage::default().latest_created_at(), 0);

        assert_eq!(LedgerState::from_image(image), state);
    }
}
