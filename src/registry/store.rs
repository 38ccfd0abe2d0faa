//! # Record Store
//!
//! Owns production record lifetimes and the id sequence.
//!
//! Every mutating method checks existence, then ownership, then input
//! validity, and only writes once all checks pass. A failed call leaves
//! the store untouched.

use std::collections::BTreeMap;

use crate::validation::MAX_DESCRIPTORS;

use super::errors::{RegistryError, RegistryResult};
use super::record::{validate_descriptors, Identity, ProductionRecord, RecordFields, RecordId};
use super::sequence::SequenceCounter;

/// Records keyed by id
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordStore {
    records: BTreeMap<RecordId, ProductionRecord>,
    sequence: SequenceCounter,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a store from persisted records and counter.
    ///
    /// Callers are expected to have validated the records already.
    pub(crate) fn from_parts(
        records: impl IntoIterator<Item = ProductionRecord>,
        last_issued: RecordId,
    ) -> Self {
        Self {
            records: records.into_iter().map(|r| (r.id, r)).collect(),
            sequence: SequenceCounter::resume(last_issued),
        }
    }

    /// Validates the fields, allocates the next id and inserts the record
    /// owned by `caller`.
    pub fn create(
        &mut self,
        fields: RecordFields,
        caller: &Identity,
        now: u64,
    ) -> RegistryResult<RecordId> {
        fields.validate()?;

        let id = self.sequence.peek_next()?;
        if self.records.contains_key(&id) {
            return Err(RegistryError::DuplicateRecordAttempt(id));
        }

        self.records
            .insert(id, ProductionRecord::new(id, fields, caller.clone(), now));
        self.sequence.commit(id);

        Ok(id)
    }

    pub fn get(&self, record_id: RecordId) -> RegistryResult<&ProductionRecord> {
        self.records
            .get(&record_id)
            .ok_or(RegistryError::RecordNotFound(record_id))
    }

    pub fn contains(&self, record_id: RecordId) -> bool {
        self.records.contains_key(&record_id)
    }

    /// Replaces every mutable field of an owned record.
    pub fn update_full(
        &mut self,
        record_id: RecordId,
        fields: RecordFields,
        caller: &Identity,
    ) -> RegistryResult<()> {
        let record = self.owned_mut(record_id, caller)?;
        fields.validate()?;
        record.replace_fields(fields);
        Ok(())
    }

    /// Appends descriptors to an owned record and returns the merged list.
    ///
    /// Fails without truncating when the merge would exceed the cap.
    pub fn append_descriptors(
        &mut self,
        record_id: RecordId,
        new_descriptors: Vec<String>,
        caller: &Identity,
    ) -> RegistryResult<Vec<String>> {
        let record = self.owned_mut(record_id, caller)?;
        validate_descriptors(&new_descriptors)?;

        let merged_len = record.descriptors.len() + new_descriptors.len();
        if merged_len > MAX_DESCRIPTORS {
            return Err(RegistryError::MetadataFormatError(format!(
                "appending {} descriptors to {} would exceed the limit of {}",
                new_descriptors.len(),
                record.descriptors.len(),
                MAX_DESCRIPTORS
            )));
        }

        record.descriptors.extend(new_descriptors);
        Ok(record.descriptors.clone())
    }

    /// Hands ownership of a record to `new_owner`.
    pub fn transfer_owner(
        &mut self,
        record_id: RecordId,
        new_owner: &Identity,
        caller: &Identity,
    ) -> RegistryResult<()> {
        let record = self.owned_mut(record_id, caller)?;
        record.owner = new_owner.clone();
        Ok(())
    }

    /// Removes an owned record and returns it. The id is never reissued.
    pub fn delete(
        &mut self,
        record_id: RecordId,
        caller: &Identity,
    ) -> RegistryResult<ProductionRecord> {
        self.owned_mut(record_id, caller)?;
        self.records
            .remove(&record_id)
            .ok_or(RegistryError::RecordNotFound(record_id))
    }

    /// Highest id ever issued, including deleted records
    pub fn last_issued_id(&self) -> RecordId {
        self.sequence.last_issued()
    }

    /// Number of live records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Live records in id order
    pub fn records(&self) -> impl Iterator<Item = &ProductionRecord> {
        self.records.values()
    }

    fn owned_mut(
        &mut self,
        record_id: RecordId,
        caller: &Identity,
    ) -> RegistryResult<&mut ProductionRecord> {
        let record = self
            .records
            .get_mut(&record_id)
            .ok_or(RegistryError::RecordNotFound(record_id))?;

        if !record.is_owned_by(caller) {
            return Err(RegistryError::OwnershipMismatch(record_id));
        }

        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p1() -> Identity {
        Identity::from("p1")
    }

    fn p2() -> Identity {
        Identity::from("p2")
    }

    fn wheat() -> RecordFields {
        RecordFields::new("Wheat", 5000, "Field A, County X", vec!["organic".to_string()])
    }

    fn tags(n: usize, prefix: &str) -> Vec<String> {
        (0..n).map(|i| format!("{}{}", prefix, i)).collect()
    }

    #[test]
    fn test_create_assigns_sequential_ids() {
        let mut store = RecordStore::new();
        assert_eq!(store.create(wheat(), &p1(), 10).unwrap(), 1);
        assert_eq!(store.create(wheat(), &p1(), 11).unwrap(), 2);

        let rec = store.get(1).unwrap();
        assert_eq!(rec.owner, p1());
        assert_eq!(rec.created_at, 10);
    }

    #[test]
    fn test_failed_create_consumes_no_id() {
        let mut store = RecordStore::new();
        let bad = RecordFields::new("Wheat", 1_000_000_000, "Field", vec!["a".into()]);
        assert!(store.create(bad, &p1(), 0).is_err());
        assert_eq!(store.last_issued_id(), 0);
        assert_eq!(store.create(wheat(), &p1(), 0).unwrap(), 1);
    }

    #[test]
    fn test_ids_not_reused_after_delete() {
        let mut store = RecordStore::new();
        let first = store.create(wheat(), &p1(), 0).unwrap();
        store.delete(first, &p1()).unwrap();
        let second = store.create(wheat(), &p1(), 0).unwrap();
        assert!(second > first);
    }

    #[test]
    fn test_get_missing() {
        let store = RecordStore::new();
        assert_eq!(store.get(1).unwrap_err(), RegistryError::RecordNotFound(1));
    }

    #[test]
    fn test_update_keeps_owner_and_created_at() {
        let mut store = RecordStore::new();
        let id = store.create(wheat(), &p1(), 5).unwrap();

        let fields = RecordFields::new("Rye", 12, "Field B", vec!["dry".into(), "late".into()]);
        store.update_full(id, fields.clone(), &p1()).unwrap();

        let rec = store.get(id).unwrap();
        assert_eq!(rec.fields(), fields);
        assert_eq!(rec.owner, p1());
        assert_eq!(rec.created_at, 5);
    }

    #[test]
    fn test_update_checks_ownership_before_fields() {
        let mut store = RecordStore::new();
        let id = store.create(wheat(), &p1(), 0).unwrap();
        let invalid = RecordFields::new("", 0, "", vec![]);
        assert_eq!(
            store.update_full(id, invalid, &p2()).unwrap_err(),
            RegistryError::OwnershipMismatch(id)
        );
    }

    #[test]
    fn test_invalid_update_leaves_record() {
        let mut store = RecordStore::new();
        let id = store.create(wheat(), &p1(), 0).unwrap();
        let invalid = RecordFields::new("Rye", 0, "Field", vec!["x".into()]);
        assert!(store.update_full(id, invalid, &p1()).is_err());
        assert_eq!(store.get(id).unwrap().fields(), wheat());
    }

    #[test]
    fn test_append_up_to_cap() {
        let mut store = RecordStore::new();
        let id = store.create(wheat(), &p1(), 0).unwrap();

        let merged = store.append_descriptors(id, tags(4, "a"), &p1()).unwrap();
        assert_eq!(merged.len(), 5);
        assert_eq!(merged[0], "organic");
        assert_eq!(merged[1], "a0");

        let merged = store.append_descriptors(id, tags(5, "b"), &p1()).unwrap();
        assert_eq!(merged.len(), 10);

        let err = store.append_descriptors(id, tags(1, "c"), &p1()).unwrap_err();
        assert!(matches!(err, RegistryError::MetadataFormatError(_)));
        assert_eq!(store.get(id).unwrap().descriptors.len(), 10);
    }

    #[test]
    fn test_append_rejects_invalid_batch() {
        let mut store = RecordStore::new();
        let id = store.create(wheat(), &p1(), 0).unwrap();

        assert!(matches!(
            store.append_descriptors(id, vec![], &p1()),
            Err(RegistryError::MetadataFormatError(_))
        ));
        assert!(matches!(
            store.append_descriptors(id, vec!["x".repeat(33)], &p1()),
            Err(RegistryError::MetadataFormatError(_))
        ));
        assert_eq!(store.get(id).unwrap().descriptors, vec!["organic".to_string()]);
    }

    #[test]
    fn test_transfer_then_old_owner_locked_out() {
        let mut store = RecordStore::new();
        let id = store.create(wheat(), &p1(), 0).unwrap();
        store.transfer_owner(id, &p2(), &p1()).unwrap();

        assert_eq!(store.get(id).unwrap().owner, p2());
        assert_eq!(
            store.transfer_owner(id, &p1(), &p1()).unwrap_err(),
            RegistryError::OwnershipMismatch(id)
        );
    }

    #[test]
    fn test_delete_requires_owner() {
        let mut store = RecordStore::new();
        let id = store.create(wheat(), &p1(), 0).unwrap();
        assert_eq!(
            store.delete(id, &p2()).unwrap_err(),
            RegistryError::OwnershipMismatch(id)
        );
        assert!(store.contains(id));

        let removed = store.delete(id, &p1()).unwrap();
        assert_eq!(removed.id, id);
        assert_eq!(store.get(id).unwrap_err(), RegistryError::RecordNotFound(id));
        assert_eq!(
            store.delete(id, &p1()).unwrap_err(),
            RegistryError::RecordNotFound(id)
        );
    }
}
