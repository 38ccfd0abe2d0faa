//! # Access Control Matrix
//!
//! Per-record sets of identities allowed to read authenticity data.
//!
//! ## Rules
//! - The creator is granted access to its own record at creation
//! - Grants are never created implicitly for anyone else
//! - Only the current owner may grant or revoke, and never revoke itself
//! - Grants are independent of ownership: transfer and delete leave them in place
//! - The system controller reads without a grant

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::errors::{RegistryError, RegistryResult};
use super::record::{Identity, ProductionRecord, RecordId};

/// A single (record, viewer) grant, the persisted form of the matrix
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AccessGrant {
    pub record_id: RecordId,
    pub viewer: Identity,
}

/// Viewer grants keyed by record id
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessMatrix {
    grants: BTreeMap<RecordId, BTreeSet<Identity>>,
}

impl AccessMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds the matrix from persisted grants
    pub fn from_grants(grants: impl IntoIterator<Item = AccessGrant>) -> Self {
        let mut matrix = Self::new();
        for grant in grants {
            matrix.insert(grant.record_id, grant.viewer);
        }
        matrix
    }

    /// Grants the owner access to a freshly created record. Internal to creation.
    pub(crate) fn grant_owner_default(&mut self, record_id: RecordId, owner: &Identity) {
        self.insert(record_id, owner.clone());
    }

    /// Owner-gated explicit grant. Idempotent.
    pub fn grant(
        &mut self,
        record: &ProductionRecord,
        viewer: &Identity,
        caller: &Identity,
    ) -> RegistryResult<()> {
        if !record.is_owned_by(caller) {
            return Err(RegistryError::OwnershipMismatch(record.id));
        }

        self.insert(record.id, viewer.clone());
        Ok(())
    }

    /// Owner-gated revoke. Removing an absent grant is not an error.
    ///
    /// Returns whether a grant was actually removed.
    pub fn revoke(
        &mut self,
        record: &ProductionRecord,
        viewer: &Identity,
        caller: &Identity,
    ) -> RegistryResult<bool> {
        if !record.is_owned_by(caller) {
            return Err(RegistryError::OwnershipMismatch(record.id));
        }

        // An owner keeps standing access to its own record
        if viewer == caller {
            return Err(RegistryError::ControllerPrivilegeRequired(format!(
                "owner cannot revoke its own access to record {}",
                record.id
            )));
        }

        Ok(self.remove(record.id, viewer))
    }

    /// Grant flag for (record, viewer); false when no entry exists.
    pub fn has_access(&self, record_id: RecordId, viewer: &Identity) -> bool {
        self.grants
            .get(&record_id)
            .map(|viewers| viewers.contains(viewer))
            .unwrap_or(false)
    }

    /// Read authorization for authenticity data: owner, grantee or controller.
    pub fn can_read(
        &self,
        record: &ProductionRecord,
        caller: &Identity,
        controller: &Identity,
    ) -> bool {
        record.is_owned_by(caller) || caller == controller || self.has_access(record.id, caller)
    }

    /// Identities granted on a record, in sorted order
    pub fn viewers(&self, record_id: RecordId) -> Vec<Identity> {
        self.grants
            .get(&record_id)
            .map(|viewers| viewers.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// All grants in (record, viewer) order
    pub fn grants(&self) -> Vec<AccessGrant> {
        self.grants
            .iter()
            .flat_map(|(record_id, viewers)| {
                viewers.iter().map(move |viewer| AccessGrant {
                    record_id: *record_id,
                    viewer: viewer.clone(),
                })
            })
            .collect()
    }

    /// Total number of grant entries
    pub fn len(&self) -> usize {
        self.grants.values().map(BTreeSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn insert(&mut self, record_id: RecordId, viewer: Identity) {
        self.grants.entry(record_id).or_default().insert(viewer);
    }

    fn remove(&mut self, record_id: RecordId, viewer: &Identity) -> bool {
        let Some(viewers) = self.grants.get_mut(&record_id) else {
            return false;
        };

        let removed = viewers.remove(viewer);
        if viewers.is_empty() {
            self.grants.remove(&record_id);
        }
        removed
    }
}
