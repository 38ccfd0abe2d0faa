//! # Registry Errors
//!
//! Error taxonomy for record store, access matrix and ledger operations.
//! Every failure is returned to the immediate caller; nothing is retried
//! and nothing is fatal.

use thiserror::Error;

use super::record::RecordId;

/// Result type for registry operations
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Registry errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    // ==================
    // Authorization Errors
    // ==================

    /// Caller lacks controller or owner rights for a restricted action
    #[error("Controller privilege required: {0}")]
    ControllerPrivilegeRequired(String),

    /// Caller is not authorized to read this record
    #[error("Permission denied for record {0}")]
    PermissionDenied(RecordId),

    /// Caller is not the record's current owner
    #[error("Caller is not the owner of record {0}")]
    OwnershipMismatch(RecordId),

    /// Reserved, not raised by any operation
    #[error("Access forbidden for record {0}")]
    AccessForbidden(RecordId),

    // ==================
    // Lookup Errors
    // ==================

    /// Referenced record does not exist
    #[error("Record {0} not found")]
    RecordNotFound(RecordId),

    /// Reserved, not raised by any operation
    #[error("Record {0} already exists")]
    DuplicateRecordAttempt(RecordId),

    // ==================
    // Validation Errors
    // ==================

    /// A bounded string is outside its length limits
    #[error("Field '{field}' length {actual} outside [{min}, {max}]")]
    StringLengthViolation {
        field: &'static str,
        actual: usize,
        min: usize,
        max: usize,
    },

    /// A numeric input is outside its bounds
    #[error("Field '{field}' value {actual} outside [{min}, {max}]")]
    NumericRangeViolation {
        field: &'static str,
        actual: u64,
        min: u64,
        max: u64,
    },

    /// Descriptor list violates count or length rules
    #[error("Metadata format error: {0}")]
    MetadataFormatError(String),

    // ==================
    // Internal Errors
    // ==================

    /// Ledger state lock was poisoned
    #[error("Ledger state unavailable: {0}")]
    StateUnavailable(String),
}

impl RegistryError {
    /// Returns the stable error code string
    pub fn code(&self) -> &'static str {
        match self {
            RegistryError::ControllerPrivilegeRequired(_) => "AGRO_CONTROLLER_PRIVILEGE_REQUIRED",
            RegistryError::PermissionDenied(_) => "AGRO_PERMISSION_DENIED",
            RegistryError::OwnershipMismatch(_) => "AGRO_OWNERSHIP_MISMATCH",
            RegistryError::AccessForbidden(_) => "AGRO_ACCESS_FORBIDDEN",
            RegistryError::RecordNotFound(_) => "AGRO_RECORD_NOT_FOUND",
            RegistryError::DuplicateRecordAttempt(_) => "AGRO_DUPLICATE_RECORD_ATTEMPT",
            RegistryError::StringLengthViolation { .. } => "AGRO_STRING_LENGTH_VIOLATION",
            RegistryError::NumericRangeViolation { .. } => "AGRO_NUMERIC_RANGE_VIOLATION",
            RegistryError::MetadataFormatError(_) => "AGRO_METADATA_FORMAT_ERROR",
            RegistryError::StateUnavailable(_) => "AGRO_STATE_UNAVAILABLE",
        }
    }

    /// Returns whether the caller can fix this by changing the request
    pub fn is_client_error(&self) -> bool {
        !matches!(self, RegistryError::StateUnavailable(_))
    }

    pub(crate) fn string_length(field: &'static str, actual: usize, min: usize, max: usize) -> Self {
        RegistryError::StringLengthViolation {
            field,
            actual,
            min,
            max,
        }
    }

    pub(crate) fn numeric_range(field: &'static str, actual: u64, min: u64, max: u64) -> Self {
        RegistryError::NumericRangeViolation {
            field,
            actual,
            min,
            max,
        }
    }
}
