//! Snapshot envelope
//!
//! ```json
//! {
//!   "format_version": 1,
//!   "created_at": "2026-10-19T08:00:00Z",
//!   "checksum": "crc32:1a2b3c4d",
//!   "state": { "last_id": 2, "records": [...], "grants": [...] }
//! }
//! ```
//!
//! The checksum covers the compact JSON encoding of `state`.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::ledger::StateImage;

use super::checksum::{compute_checksum, format_checksum, parse_checksum};
use super::errors::{SnapshotError, SnapshotResult};

/// Current envelope format version
pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotEnvelope {
    pub format_version: u32,
    pub created_at: String,
    pub checksum: String,
    pub state: StateImage,
}

impl SnapshotEnvelope {
    /// Seals a state image with its checksum and the current time.
    pub fn seal(state: StateImage) -> SnapshotResult<Self> {
        Self::seal_at(state, Utc::now())
    }

    pub fn seal_at(state: StateImage, at: DateTime<Utc>) -> SnapshotResult<Self> {
        let checksum = format_checksum(compute_checksum(&state_bytes(&state)?));
        Ok(Self {
            format_version: FORMAT_VERSION,
            created_at: at.to_rfc3339_opts(SecondsFormat::Secs, true),
            checksum,
            state,
        })
    }

    pub fn to_json(&self) -> SnapshotResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| SnapshotError::format_error(format!("Failed to serialize snapshot: {}", e)))
    }

    /// Parses and fully checks an envelope: version, checksum and state
    /// invariants. Returns the state only if every check passes.
    pub fn open(json: &str) -> SnapshotResult<StateImage> {
        let envelope: SnapshotEnvelope = serde_json::from_str(json)
            .map_err(|e| SnapshotError::format_error(format!("Failed to parse snapshot: {}", e)))?;

        if envelope.format_version != FORMAT_VERSION {
            return Err(SnapshotError::format_error(format!(
                "Unsupported snapshot format version {}",
                envelope.format_version
            )));
        }

        DateTime::parse_from_rfc3339(&envelope.created_at).map_err(|e| {
            SnapshotError::format_error(format!("Invalid created_at '{}': {}", envelope.created_at, e))
        })?;

        let stored = parse_checksum(&envelope.checksum).ok_or_else(|| {
            SnapshotError::format_error(format!("Invalid checksum field '{}'", envelope.checksum))
        })?;
        let computed = compute_checksum(&state_bytes(&envelope.state)?);
        if stored != computed {
            return Err(SnapshotError::checksum_mismatch(
                &envelope.checksum,
                &format_checksum(computed),
            ));
        }

        validate_state(&envelope.state)?;
        Ok(envelope.state)
    }
}

fn state_bytes(state: &StateImage) -> SnapshotResult<Vec<u8>> {
    serde_json::to_vec(state)
        .map_err(|e| SnapshotError::format_error(format!("Failed to encode state: {}", e)))
}

/// Checks the invariants a loaded state must satisfy before the ledger
/// will run on it.
pub fn validate_state(state: &StateImage) -> SnapshotResult<()> {
    let mut previous = 0;

    for record in &state.records {
        if record.id == 0 || record.id <= previous {
            return Err(SnapshotError::invalid_state(format!(
                "record ids must be unique and ascending, found {} after {}",
                record.id, previous
            )));
        }
        if record.id > state.last_id {
            return Err(SnapshotError::invalid_state(format!(
                "record {} is above the sequence counter {}",
                record.id, state.last_id
            )));
        }
        record.fields().validate().map_err(|e| {
            SnapshotError::invalid_state(format!("record {}: {}", record.id, e))
        })?;
        previous = record.id;
    }

    if let Some(grant) = state.grants.iter().find(|g| g.record_id > state.last_id) {
        return Err(SnapshotError::invalid_state(format!(
            "grant for record {} was never issued (counter {})",
            grant.record_id, state.last_id
        )));
    }

    Ok(())
}
