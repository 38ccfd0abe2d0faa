//! Field bounds and the predicates that enforce them
//!
//! Lengths are measured in bytes of the UTF-8 encoding.

/// Minimum species name length
pub const MIN_SPECIES_LEN: usize = 1;
/// Maximum species name length
pub const MAX_SPECIES_LEN: usize = 64;

/// Minimum site description length
pub const MIN_SITE_INFO_LEN: usize = 1;
/// Maximum site description length
pub const MAX_SITE_INFO_LEN: usize = 128;

/// Minimum output volume
pub const MIN_OUTPUT_VOLUME: u64 = 1;
/// Maximum output volume
pub const MAX_OUTPUT_VOLUME: u64 = 999_999_999;

/// Minimum number of descriptors on a record
pub const MIN_DESCRIPTORS: usize = 1;
/// Maximum number of descriptors on a record
pub const MAX_DESCRIPTORS: usize = 10;

/// Minimum length of a single descriptor
pub const MIN_DESCRIPTOR_LEN: usize = 1;
/// Maximum length of a single descriptor
pub const MAX_DESCRIPTOR_LEN: usize = 32;

/// Returns true iff `min_len <= s.len() <= max_len`.
pub fn string_in_bounds(s: &str, min_len: usize, max_len: usize) -> bool {
    let len = s.len();
    min_len <= len && len <= max_len
}

/// Returns true iff `min <= n <= max`.
pub fn numeric_in_range(n: u64, min: u64, max: u64) -> bool {
    min <= n && n <= max
}

/// Returns true iff the list holds 1..=10 entries and every entry is
/// 1..=32 bytes long.
pub fn descriptor_set_valid<S: AsRef<str>>(list: &[S]) -> bool {
    if list.len() < MIN_DESCRIPTORS || list.len() > MAX_DESCRIPTORS {
        return false;
    }

    list.iter()
        .all(|d| string_in_bounds(d.as_ref(), MIN_DESCRIPTOR_LEN, MAX_DESCRIPTOR_LEN))
}
