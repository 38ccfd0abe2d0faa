//! Ledger operations
//!
//! Every public operation runs under one global lock: it reads state,
//! validates, authorizes the caller and applies at most one mutation
//! before the lock is released. A rejected operation leaves no trace in
//! the state.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::clock::{Clock, SystemClock};
use crate::observability::{
    AuditLog, AuditOutcome, AuditRecord, Event, Logger, MetricsRegistry, MetricsSnapshot,
    Severity,
};
use crate::registry::{
    AuthenticityResult, Identity, NoopHooks, ProductionRecord, RecordFields, RecordHooks,
    RecordId, RegistryError, RegistryResult,
};

use super::state::{LedgerState, StateImage};

/// Builder for [`Ledger`]
pub struct LedgerBuilder {
    controller: Identity,
    clock: Arc<dyn Clock>,
    hooks: Arc<dyn RecordHooks>,
    audit: Option<Arc<dyn AuditLog>>,
    state: LedgerState,
}

impl LedgerBuilder {
    pub fn new(controller: Identity) -> Self {
        Self {
            controller,
            clock: Arc::new(SystemClock::new()),
            hooks: Arc::new(NoopHooks),
            audit: None,
            state: LedgerState::default(),
        }
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn hooks(mut self, hooks: Arc<dyn RecordHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn audit_log(mut self, audit: Arc<dyn AuditLog>) -> Self {
        self.audit = Some(audit);
        self
    }

    /// Starts from previously persisted state instead of an empty ledger.
    ///
    /// The image must already have passed snapshot validation.
    pub fn state(mut self, image: StateImage) -> Self {
        self.state = LedgerState::from_image(image);
        self
    }

    pub fn build(self) -> Ledger {
        let metrics = MetricsRegistry::new();
        metrics.set_live_records(self.state.store.len() as u64);

        Ledger {
            state: Mutex::new(self.state),
            controller: self.controller,
            clock: self.clock,
            hooks: self.hooks,
            audit: self.audit,
            metrics,
        }
    }
}

/// The production record ledger
pub struct Ledger {
    state: Mutex<LedgerState>,
    controller: Identity,
    clock: Arc<dyn Clock>,
    hooks: Arc<dyn RecordHooks>,
    audit: Option<Arc<dyn AuditLog>>,
    metrics: MetricsRegistry,
}

impl Ledger {
    /// Empty ledger on the system clock
    pub fn new(controller: Identity) -> Self {
        LedgerBuilder::new(controller).build()
    }

    pub fn builder(controller: Identity) -> LedgerBuilder {
        LedgerBuilder::new(controller)
    }

    /// The system controller identity fixed at deployment
    pub fn controller(&self) -> &Identity {
        &self.controller
    }

    // ==================
    // Owner Operations
    // ==================

    /// Registers a new record owned by `caller` and grants the caller
    /// access to it. Returns the new id.
    pub fn create_production_record(
        &self,
        caller: &Identity,
        fields: RecordFields,
    ) -> RegistryResult<RecordId> {
        let result = self.with_state(|state| {
            let now = self.clock.now();
            let id = state.store.create(fields, caller, now)?;
            state.access.grant_owner_default(id, caller);
            Ok(id)
        });

        if result.is_ok() {
            self.metrics.record_created();
        }
        let record_id = result.as_ref().ok().copied();
        self.observe(
            "create_production_record",
            Event::RecordCreated,
            caller,
            record_id,
            result,
        )
    }

    /// Hands the record to `new_owner`. Grants are left as they are,
    /// including the previous owner's.
    pub fn transfer_production_ownership(
        &self,
        caller: &Identity,
        record_id: RecordId,
        new_owner: &Identity,
    ) -> RegistryResult<()> {
        let result =
            self.with_state(|state| state.store.transfer_owner(record_id, new_owner, caller));

        if result.is_ok() {
            self.metrics.ownership_transferred();
        }
        self.observe(
            "transfer_production_ownership",
            Event::OwnershipTransferred,
            caller,
            Some(record_id),
            result,
        )
    }

    /// Grants `viewer` read access to authenticity data.
    pub fn grant_viewing_access(
        &self,
        caller: &Identity,
        record_id: RecordId,
        viewer: &Identity,
    ) -> RegistryResult<()> {
        let result = self.with_state(|state| {
            let record = state.store.get(record_id)?;
            state.access.grant(record, viewer, caller)
        });

        if result.is_ok() {
            self.metrics.grant_issued();
        }
        self.observe(
            "grant_viewing_access",
            Event::AccessGranted,
            caller,
            Some(record_id),
            result,
        )
    }

    /// Removes `viewer`'s grant. The owner cannot revoke itself; an absent
    /// grant is not an error.
    pub fn revoke_viewing_access(
        &self,
        caller: &Identity,
        record_id: RecordId,
        viewer: &Identity,
    ) -> RegistryResult<()> {
        let result = self.with_state(|state| {
            let record = state.store.get(record_id)?;
            state.access.revoke(record, viewer, caller).map(|_| ())
        });

        if result.is_ok() {
            self.metrics.grant_revoked();
        }
        self.observe(
            "revoke_viewing_access",
            Event::AccessRevoked,
            caller,
            Some(record_id),
            result,
        )
    }

    /// Appends descriptors and returns the merged list.
    pub fn append_metadata_descriptors(
        &self,
        caller: &Identity,
        record_id: RecordId,
        new_descriptors: Vec<String>,
    ) -> RegistryResult<Vec<String>> {
        let result = self.with_state(|state| {
            state
                .store
                .append_descriptors(record_id, new_descriptors, caller)
        });

        if result.is_ok() {
            self.metrics.descriptors_appended();
        }
        self.observe(
            "append_metadata_descriptors",
            Event::DescriptorsAppended,
            caller,
            Some(record_id),
            result,
        )
    }

    /// Replaces every mutable field of the record.
    pub fn modify_production_record(
        &self,
        caller: &Identity,
        record_id: RecordId,
        fields: RecordFields,
    ) -> RegistryResult<()> {
        let result = self.with_state(|state| state.store.update_full(record_id, fields, caller));

        if result.is_ok() {
            self.metrics.record_modified();
        }
        self.observe(
            "modify_production_record",
            Event::RecordModified,
            caller,
            Some(record_id),
            result,
        )
    }

    /// Removes the record. Its grants stay in the matrix and remain
    /// visible through `has_viewing_access`.
    pub fn delete_production_record(
        &self,
        caller: &Identity,
        record_id: RecordId,
    ) -> RegistryResult<()> {
        let result = self
            .with_state(|state| {
                let removed = state.store.delete(record_id, caller)?;
                let stale = state.access.viewers(record_id);
                Ok((removed, stale))
            })
            .map(|(removed, stale)| self.hooks.on_record_deleted(&removed, &stale));

        if result.is_ok() {
            self.metrics.record_deleted();
        }
        self.observe(
            "delete_production_record",
            Event::RecordDeleted,
            caller,
            Some(record_id),
            result,
        )
    }

    // ==================
    // Read Operations
    // ==================

    /// Compares `claimed_owner` with the actual owner. Readable by the
    /// owner, any grantee and the system controller. Never mutates.
    pub fn verify_production_authenticity(
        &self,
        caller: &Identity,
        record_id: RecordId,
        claimed_owner: &Identity,
    ) -> RegistryResult<AuthenticityResult> {
        let result = self.with_state(|state| {
            let record = state.store.get(record_id)?;
            if !state.access.can_read(record, caller, &self.controller) {
                return Err(RegistryError::PermissionDenied(record_id));
            }
            Ok(AuthenticityResult::evaluate(
                record,
                claimed_owner,
                self.clock.now(),
            ))
        });

        if result.is_ok() {
            self.metrics.verification();
        }
        self.observe(
            "verify_production_authenticity",
            Event::AuthenticityVerified,
            caller,
            Some(record_id),
            result,
        )
    }

    /// Direct lookup by id
    pub fn get_production_record(&self, record_id: RecordId) -> RegistryResult<ProductionRecord> {
        self.with_state(|state| state.store.get(record_id).cloned())
    }

    /// Grant flag for (record, viewer). Does not require the record to
    /// exist: grants of deleted records are still reported.
    pub fn has_viewing_access(&self, record_id: RecordId, viewer: &Identity) -> RegistryResult<bool> {
        self.with_state(|state| Ok(state.access.has_access(record_id, viewer)))
    }

    // ==================
    // Controller Operations
    // ==================

    /// Authorizes an emergency restriction by the controller or the owner.
    ///
    /// No restriction state exists yet: after authorization the record is
    /// handed to `RecordHooks::on_emergency_restriction` and nothing is
    /// persisted.
    pub fn apply_emergency_restriction(
        &self,
        caller: &Identity,
        record_id: RecordId,
    ) -> RegistryResult<()> {
        let result = self
            .with_state(|state| {
                let record = state.store.get(record_id)?;
                if caller != &self.controller && !record.is_owned_by(caller) {
                    return Err(RegistryError::ControllerPrivilegeRequired(format!(
                        "emergency restriction of record {} requires the controller or owner",
                        record_id
                    )));
                }
                Ok(record.clone())
            })
            .map(|record| self.hooks.on_emergency_restriction(&record, caller));

        if result.is_ok() {
            self.metrics.emergency_restriction();
        }
        self.observe(
            "apply_emergency_restriction",
            Event::EmergencyRestriction,
            caller,
            Some(record_id),
            result,
        )
    }

    // ==================
    // Introspection
    // ==================

    /// Number of live records
    pub fn record_count(&self) -> RegistryResult<usize> {
        self.with_state(|state| Ok(state.store.len()))
    }

    /// Highest id ever issued
    pub fn last_issued_id(&self) -> RegistryResult<RecordId> {
        self.with_state(|state| Ok(state.store.last_issued_id()))
    }

    /// Consistent copy of the durable state
    pub fn export_state(&self) -> RegistryResult<StateImage> {
        self.with_state(|state| Ok(state.image()))
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Appends to the configured audit log, if any. A failing sink is
    /// logged and otherwise ignored.
    pub fn append_audit(&self, record: &AuditRecord) {
        let Some(log) = &self.audit else {
            return;
        };

        if let Err(e) = log.append(record) {
            let message = e.to_string();
            Logger::error(
                Event::OperationRejected,
                &[
                    ("audit_error", message.as_str()),
                    ("operation", record.operation.as_str()),
                ],
            );
        }
    }

    fn lock(&self) -> RegistryResult<MutexGuard<'_, LedgerState>> {
        self.state
            .lock()
            .map_err(|_| RegistryError::StateUnavailable("ledger lock poisoned".to_string()))
    }

    fn with_state<T>(
        &self,
        op: impl FnOnce(&mut LedgerState) -> RegistryResult<T>,
    ) -> RegistryResult<T> {
        let mut guard = self.lock()?;
        op(&mut guard)
    }

    /// Logs, audits and counts the outcome of a public operation.
    fn observe<T>(
        &self,
        operation: &'static str,
        event: Event,
        caller: &Identity,
        record_id: Option<RecordId>,
        result: RegistryResult<T>,
    ) -> RegistryResult<T> {
        let id_text = record_id.map(|id| id.to_string()).unwrap_or_default();
        let mut audit = match &result {
            Ok(_) => {
                Logger::info(
                    event,
                    &[("caller", caller.as_str()), ("record_id", id_text.as_str())],
                );
                AuditRecord::new(operation, caller, AuditOutcome::Success)
            }
            Err(err) => {
                self.metrics.operation_rejected();
                let message = err.to_string();
                let severity = if err.is_client_error() {
                    Severity::Warn
                } else {
                    Severity::Error
                };
                Logger::log(
                    severity,
                    Event::OperationRejected,
                    &[
                        ("caller", caller.as_str()),
                        ("code", err.code()),
                        ("message", message.as_str()),
                        ("operation", operation),
                        ("record_id", id_text.as_str()),
                    ],
                );
                AuditRecord::new(operation, caller, AuditOutcome::Rejected)
                    .with_error_code(err.code())
            }
        };

        if let Some(id) = record_id {
            audit = audit.with_record(id);
        }

        self.append_audit(&audit);
        result
    }
}
