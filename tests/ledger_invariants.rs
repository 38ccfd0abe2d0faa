//! Ledger Invariant Tests
//!
//! Tests for invariants:
//! - Record ids are unique, strictly increasing and never reused
//! - Stored records always satisfy the field bounds
//! - Owner-gated operations refuse every other caller
//! - A rejected operation leaves state untouched
//! - `created_at` never changes after creation

use std::sync::Arc;

use agroledger::clock::ManualClock;
use agroledger::{Identity, Ledger, RecordFields, RegistryError};

// =============================================================================
// Test Utilities
// =============================================================================

fn ledger_at(start: u64) -> (Ledger, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(start));
    let ledger = Ledger::builder(Identity::from("controller"))
        .clock(clock.clone())
        .build();
    (ledger, clock)
}

fn wheat() -> RecordFields {
    RecordFields::new(
        "Wheat",
        5000,
        "Field A, County X",
        vec!["organic".to_string()],
    )
}

fn fields_with_volume(volume: u64) -> RecordFields {
    RecordFields::new("Maize", volume, "Plot 4", vec!["hybrid".to_string()])
}

fn p1() -> Identity {
    Identity::from("P1")
}

fn p2() -> Identity {
    Identity::from("P2")
}

// =============================================================================
// Id sequence
// =============================================================================

#[test]
fn test_ids_strictly_increase_across_deletes() {
    let (ledger, _) = ledger_at(0);

    let mut issued = Vec::new();
    for round in 0..5 {
        let id = ledger.create_production_record(&p1(), wheat()).unwrap();
        issued.push(id);
        if round % 2 == 0 {
            ledger.delete_production_record(&p1(), id).unwrap();
        }
    }

    assert_eq!(issued, vec![1, 2, 3, 4, 5]);
    assert_eq!(ledger.last_issued_id().unwrap(), 5);
    assert_eq!(ledger.record_count().unwrap(), 2);
}

#[test]
fn test_rejected_create_consumes_no_id() {
    let (ledger, _) = ledger_at(0);

    let err = ledger
        .create_production_record(&p1(), fields_with_volume(0))
        .unwrap_err();
    assert!(matches!(err, RegistryError::NumericRangeViolation { .. }));
    assert_eq!(ledger.last_issued_id().unwrap(), 0);

    assert_eq!(ledger.create_production_record(&p1(), wheat()).unwrap(), 1);
}

// =============================================================================
// Field bounds
// =============================================================================

#[test]
fn test_output_volume_upper_boundary() {
    let (ledger, _) = ledger_at(0);

    let err = ledger
        .create_production_record(&p1(), fields_with_volume(1_000_000_000))
        .unwrap_err();
    assert!(matches!(
        err,
        RegistryError::NumericRangeViolation { field: "output_volume", .. }
    ));

    let id = ledger
        .create_production_record(&p1(), fields_with_volume(999_999_999))
        .unwrap();
    assert_eq!(
        ledger.get_production_record(id).unwrap().output_volume,
        999_999_999
    );
}

#[test]
fn test_string_boundaries() {
    let (ledger, _) = ledger_at(0);

    let max_species = RecordFields::new("s".repeat(64), 1, "x".repeat(128), vec!["d".repeat(32)]);
    assert!(ledger.create_production_record(&p1(), max_species).is_ok());

    let long_species = RecordFields::new("s".repeat(65), 1, "site", vec!["d".into()]);
    assert!(matches!(
        ledger.create_production_record(&p1(), long_species),
        Err(RegistryError::StringLengthViolation { field: "species", .. })
    ));

    let long_site = RecordFields::new("Oats", 1, "x".repeat(129), vec!["d".into()]);
    assert!(matches!(
        ledger.create_production_record(&p1(), long_site),
        Err(RegistryError::StringLengthViolation { field: "site_info", .. })
    ));
}

#[test]
fn test_descriptor_cap_without_truncation() {
    let (ledger, _) = ledger_at(0);
    let id = ledger.create_production_record(&p1(), wheat()).unwrap();

    let nine: Vec<String> = (0..9).map(|i| format!("tag{}", i)).collect();
    let merged = ledger
        .append_metadata_descriptors(&p1(), id, nine)
        .unwrap();
    assert_eq!(merged.len(), 10);

    let err = ledger
        .append_metadata_descriptors(&p1(), id, vec!["overflow".to_string()])
        .unwrap_err();
    assert!(matches!(err, RegistryError::MetadataFormatError(_)));

    let record = ledger.get_production_record(id).unwrap();
    assert_eq!(record.descriptors.len(), 10);
    assert!(!record.descriptors.contains(&"overflow".to_string()));
}

#[test]
fn test_create_with_eleven_descriptors_rejected() {
    let (ledger, _) = ledger_at(0);
    let eleven: Vec<String> = (0..11).map(|i| format!("d{}", i)).collect();

    let err = ledger
        .create_production_record(&p1(), RecordFields::new("Rice", 3, "Paddy", eleven))
        .unwrap_err();
    assert!(matches!(err, RegistryError::MetadataFormatError(_)));
    assert_eq!(ledger.record_count().unwrap(), 0);
}

// =============================================================================
// Ownership gating
// =============================================================================

#[test]
fn test_owner_gated_operations_refuse_strangers() {
    let (ledger, _) = ledger_at(0);
    let id = ledger.create_production_record(&p1(), wheat()).unwrap();
    let before = ledger.get_production_record(id).unwrap();

    assert_eq!(
        ledger.transfer_production_ownership(&p2(), id, &p2()).unwrap_err(),
        RegistryError::OwnershipMismatch(id)
    );
    assert_eq!(
        ledger.modify_production_record(&p2(), id, fields_with_volume(7)).unwrap_err(),
        RegistryError::OwnershipMismatch(id)
    );
    assert_eq!(
        ledger
            .append_metadata_descriptors(&p2(), id, vec!["x".into()])
            .unwrap_err(),
        RegistryError::OwnershipMismatch(id)
    );
    assert_eq!(
        ledger.delete_production_record(&p2(), id).unwrap_err(),
        RegistryError::OwnershipMismatch(id)
    );

    assert_eq!(ledger.get_production_record(id).unwrap(), before);
}

#[test]
fn test_controller_is_not_an_owner() {
    let (ledger, _) = ledger_at(0);
    let id = ledger.create_production_record(&p1(), wheat()).unwrap();

    assert_eq!(
        ledger
            .delete_production_record(&Identity::from("controller"), id)
            .unwrap_err(),
        RegistryError::OwnershipMismatch(id)
    );
}

#[test]
fn test_ownership_checked_before_validation() {
    let (ledger, _) = ledger_at(0);
    let id = ledger.create_production_record(&p1(), wheat()).unwrap();

    let err = ledger
        .modify_production_record(&p2(), id, fields_with_volume(0))
        .unwrap_err();
    assert_eq!(err, RegistryError::OwnershipMismatch(id));
}

#[test]
fn test_operations_on_deleted_record() {
    let (ledger, _) = ledger_at(0);
    let id = ledger.create_production_record(&p1(), wheat()).unwrap();
    ledger.delete_production_record(&p1(), id).unwrap();

    assert_eq!(
        ledger.get_production_record(id).unwrap_err(),
        RegistryError::RecordNotFound(id)
    );
    assert_eq!(
        ledger
            .verify_production_authenticity(&p1(), id, &p1())
            .unwrap_err(),
        RegistryError::RecordNotFound(id)
    );
    assert_eq!(
        ledger.transfer_production_ownership(&p1(), id, &p2()).unwrap_err(),
        RegistryError::RecordNotFound(id)
    );
    assert_eq!(
        ledger
            .modify_production_record(&p1(), id, fields_with_volume(7))
            .unwrap_err(),
        RegistryError::RecordNotFound(id)
    );
    assert_eq!(
        ledger
            .append_metadata_descriptors(&p1(), id, vec!["late".into()])
            .unwrap_err(),
        RegistryError::RecordNotFound(id)
    );
    assert_eq!(
        ledger.grant_viewing_access(&p1(), id, &p2()).unwrap_err(),
        RegistryError::RecordNotFound(id)
    );
    assert_eq!(
        ledger.revoke_viewing_access(&p1(), id, &p2()).unwrap_err(),
        RegistryError::RecordNotFound(id)
    );
    assert_eq!(
        ledger.delete_production_record(&p1(), id).unwrap_err(),
        RegistryError::RecordNotFound(id)
    );
    assert_eq!(
        ledger.apply_emergency_restriction(&p1(), id).unwrap_err(),
        RegistryError::RecordNotFound(id)
    );
}

// =============================================================================
// Timestamps
// =============================================================================

#[test]
fn test_modify_preserves_created_at_and_owner() {
    let (ledger, clock) = ledger_at(100);
    let id = ledger.create_production_record(&p1(), wheat()).unwrap();

    clock.advance(50);
    ledger
        .modify_production_record(&p1(), id, fields_with_volume(42))
        .unwrap();

    let record = ledger.get_production_record(id).unwrap();
    assert_eq!(record.created_at, 100);
    assert_eq!(record.owner, p1());
    assert_eq!(record.output_volume, 42);
    assert_eq!(record.species, "Maize");
}

#[test]
fn test_verification_age_tracks_clock() {
    let (ledger, clock) = ledger_at(1_000);
    let id = ledger.create_production_record(&p1(), wheat()).unwrap();

    clock.advance(250);
    let result = ledger
        .verify_production_authenticity(&p1(), id, &p1())
        .unwrap();

    assert!(result.is_authentic);
    assert!(result.owner_match);
    assert_eq!(result.current_time, 1_250);
    assert_eq!(result.age, 250);
}

// =============================================================================
// Concurrency
// =============================================================================

#[test]
fn test_concurrent_creates_issue_unique_ids() {
    let (ledger, _) = ledger_at(0);
    let ledger = Arc::new(ledger);

    let handles: Vec<_> = (0..8)
        .map(|t| {
            let ledger = Arc::clone(&ledger);
            std::thread::spawn(move || {
                let caller = Identity::new(format!("producer-{}", t));
                (0..25)
                    .map(|_| ledger.create_production_record(&caller, wheat()).unwrap())
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let mut ids: Vec<u64> = handles
        .into_iter()
        .flat_map(|h| h.join().unwrap())
        .collect();
    ids.sort_unstable();

    assert_eq!(ids, (1..=200).collect::<Vec<u64>>());
    assert_eq!(ledger.last_issued_id().unwrap(), 200);
}
