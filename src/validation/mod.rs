//! Input validation for production records
//!
//! Pure, total predicates. Every mutating ledger operation runs these
//! before touching state; a failing check aborts the operation with no
//! partial effect.

mod bounds;

pub use bounds::{
    descriptor_set_valid, numeric_in_range, string_in_bounds, MAX_DESCRIPTORS,
    MAX_DESCRIPTOR_LEN, MAX_OUTPUT_VOLUME, MAX_SITE_INFO_LEN, MAX_SPECIES_LEN, MIN_DESCRIPTORS,
    MIN_DESCRIPTOR_LEN, MIN_OUTPUT_VOLUME, MIN_SITE_INFO_LEN, MIN_SPECIES_LEN,
};
