//! # Production Records
//!
//! Record model, caller identities and the authenticity verdict.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::validation::{
    descriptor_set_valid, numeric_in_range, string_in_bounds, MAX_DESCRIPTORS,
    MAX_DESCRIPTOR_LEN, MAX_OUTPUT_VOLUME, MAX_SITE_INFO_LEN, MAX_SPECIES_LEN,
    MIN_OUTPUT_VOLUME, MIN_SITE_INFO_LEN, MIN_SPECIES_LEN,
};

use super::errors::{RegistryError, RegistryResult};

/// Sequential record identifier. Never reused.
pub type RecordId = u64;

/// Opaque principal identifying a caller (producer, viewer or controller)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Identity {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for Identity {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// The caller-supplied, mutable part of a production record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordFields {
    /// Cultivated species name (1..=64 bytes)
    pub species: String,

    /// Quantity produced (1..=999,999,999)
    pub output_volume: u64,

    /// Cultivation location description (1..=128 bytes)
    pub site_info: String,

    /// Free-form metadata tags (1..=10 entries, each 1..=32 bytes)
    pub descriptors: Vec<String>,
}

impl RecordFields {
    pub fn new(
        species: impl Into<String>,
        output_volume: u64,
        site_info: impl Into<String>,
        descriptors: Vec<String>,
    ) -> Self {
        Self {
            species: species.into(),
            output_volume,
            site_info: site_info.into(),
            descriptors,
        }
    }

    /// Validates every field in declaration order, stopping at the first
    /// failure: species, output_volume, site_info, descriptors.
    pub fn validate(&self) -> RegistryResult<()> {
        if !string_in_bounds(&self.species, MIN_SPECIES_LEN, MAX_SPECIES_LEN) {
            return Err(RegistryError::string_length(
                "species",
                self.species.len(),
                MIN_SPECIES_LEN,
                MAX_SPECIES_LEN,
            ));
        }

        if !numeric_in_range(self.output_volume, MIN_OUTPUT_VOLUME, MAX_OUTPUT_VOLUME) {
            return Err(RegistryError::numeric_range(
                "output_volume",
                self.output_volume,
                MIN_OUTPUT_VOLUME,
                MAX_OUTPUT_VOLUME,
            ));
        }

        if !string_in_bounds(&self.site_info, MIN_SITE_INFO_LEN, MAX_SITE_INFO_LEN) {
            return Err(RegistryError::string_length(
                "site_info",
                self.site_info.len(),
                MIN_SITE_INFO_LEN,
                MAX_SITE_INFO_LEN,
            ));
        }

        validate_descriptors(&self.descriptors)
    }
}

/// Checks a descriptor list, describing the first rule it breaks.
pub(crate) fn validate_descriptors(descriptors: &[String]) -> RegistryResult<()> {
    if descriptor_set_valid(descriptors) {
        return Ok(());
    }

    if descriptors.is_empty() {
        return Err(RegistryError::MetadataFormatError(
            "at least one descriptor is required".to_string(),
        ));
    }

    if descriptors.len() > MAX_DESCRIPTORS {
        return Err(RegistryError::MetadataFormatError(format!(
            "{} descriptors exceeds the limit of {}",
            descriptors.len(),
            MAX_DESCRIPTORS
        )));
    }

    let (index, bad) = descriptors
        .iter()
        .enumerate()
        .find(|(_, d)| d.is_empty() || d.len() > MAX_DESCRIPTOR_LEN)
        .map(|(i, d)| (i, d.len()))
        .unwrap_or((0, 0));

    Err(RegistryError::MetadataFormatError(format!(
        "descriptor {} has length {}, expected 1..={}",
        index, bad, MAX_DESCRIPTOR_LEN
    )))
}

/// A registered production event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductionRecord {
    /// Record identifier
    pub id: RecordId,

    /// Cultivated species name
    pub species: String,

    /// Current controlling identity
    pub owner: Identity,

    /// Quantity produced
    pub output_volume: u64,

    /// Clock value at creation, never modified
    pub created_at: u64,

    /// Cultivation location description
    pub site_info: String,

    /// Metadata tags
    pub descriptors: Vec<String>,
}

impl ProductionRecord {
    pub(crate) fn new(id: RecordId, fields: RecordFields, owner: Identity, created_at: u64) -> Self {
        Self {
            id,
            species: fields.species,
            owner,
            output_volume: fields.output_volume,
            created_at,
            site_info: fields.site_info,
            descriptors: fields.descriptors,
        }
    }

    /// Returns the mutable fields as a `RecordFields` value
    pub fn fields(&self) -> RecordFields {
        RecordFields {
            species: self.species.clone(),
            output_volume: self.output_volume,
            site_info: self.site_info.clone(),
            descriptors: self.descriptors.clone(),
        }
    }

    /// Replaces every mutable field. Owner and creation time stay put.
    pub(crate) fn replace_fields(&mut self, fields: RecordFields) {
        self.species = fields.species;
        self.output_volume = fields.output_volume;
        self.site_info = fields.site_info;
        self.descriptors = fields.descriptors;
    }

    pub fn is_owned_by(&self, identity: &Identity) -> bool {
        &self.owner == identity
    }
}

/// Outcome of an authenticity check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticityResult {
    /// True iff the claimed owner is the actual owner
    pub is_authentic: bool,

    /// Clock value at verification time
    pub current_time: u64,

    /// Clock ticks elapsed since creation
    pub age: u64,

    /// Mirror of `is_authentic`
    #[serde(rename = "match")]
    pub owner_match: bool,
}

impl AuthenticityResult {
    pub(crate) fn evaluate(record: &ProductionRecord, claimed_owner: &Identity, now: u64) -> Self {
        let is_authentic = record.is_owned_by(claimed_owner);
        Self {
            is_authentic,
            current_time: now,
            age: now.saturating_sub(record.created_at),
            owner_match: is_authentic,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wheat() -> RecordFields {
        RecordFields::new("Wheat", 5000, "Field A, County X", vec!["organic".to_string()])
    }

    #[test]
    fn test_valid_fields_pass() {
        assert!(wheat().validate().is_ok());
    }

    #[test]
    fn test_validation_order_species_first() {
        let fields = RecordFields::new("", 0, "", vec![]);
        assert!(matches!(
            fields.validate(),
            Err(RegistryError::StringLengthViolation { field: "species", .. })
        ));
    }

    #[test]
    fn test_validation_order_volume_before_site() {
        let fields = RecordFields::new("Wheat", 0, "", vec![]);
        assert!(matches!(
            fields.validate(),
            Err(RegistryError::NumericRangeViolation { field: "output_volume", .. })
        ));
    }

    #[test]
    fn test_validation_order_site_before_descriptors() {
        let fields = RecordFields::new("Wheat", 10, "x".repeat(129), vec![]);
        assert!(matches!(
            fields.validate(),
            Err(RegistryError::StringLengthViolation { field: "site_info", .. })
        ));
    }

    #[test]
    fn test_descriptor_errors_are_metadata_errors() {
        let fields = RecordFields::new("Wheat", 10, "Field", vec![]);
        assert!(matches!(fields.validate(), Err(RegistryError::MetadataFormatError(_))));

        let fields = RecordFields::new("Wheat", 10, "Field", vec!["x".repeat(33)]);
        assert!(matches!(fields.validate(), Err(RegistryError::MetadataFormatError(_))));
    }

    #[test]
    fn test_authenticity_mirrors_match() {
        let record = ProductionRecord::new(1, wheat(), Identity::from("p1"), 10);

        let ok = AuthenticityResult::evaluate(&record, &Identity::from("p1"), 25);
        assert!(ok.is_authentic);
        assert!(ok.owner_match);
        assert_eq!(ok.age, 15);
        assert_eq!(ok.current_time, 25);

        let bad = AuthenticityResult::evaluate(&record, &Identity::from("p2"), 25);
        assert!(!bad.is_authentic);
        assert!(!bad.owner_match);
    }

    #[test]
    fn test_authenticity_serializes_match_key() {
        let record = ProductionRecord::new(1, wheat(), Identity::from("p1"), 0);
        let result = AuthenticityResult::evaluate(&record, &Identity::from("p1"), 3);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["match"], true);
        assert_eq!(json["is_authentic"], true);
    }

    #[test]
    fn test_identity_is_transparent_in_json() {
        let json = serde_json::to_string(&Identity::from("farmer-1")).unwrap();
        assert_eq!(json, "\"farmer-1\"");
    }
}
