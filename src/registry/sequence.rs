//! Record id sequence
//!
//! Holds the highest id issued so far. Only the record store advances it,
//! inside the same unit of work that inserts the record.

use serde::{Deserialize, Serialize};

use super::errors::{RegistryError, RegistryResult};
use super::record::RecordId;

/// Monotonic record id counter. Starts at 0; the first issued id is 1.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SequenceCounter {
    last: RecordId,
}

impl SequenceCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restores a counter from persisted state
    pub(crate) fn resume(last: RecordId) -> Self {
        Self { last }
    }

    /// Highest id issued so far (0 if none)
    pub fn last_issued(&self) -> RecordId {
        self.last
    }

    /// Computes the next id without advancing.
    pub(crate) fn peek_next(&self) -> RegistryResult<RecordId> {
        self.last
            .checked_add(1)
            .ok_or_else(|| RegistryError::StateUnavailable("record id sequence exhausted".into()))
    }

    /// Advances the counter to `id`, which must come from `peek_next`.
    pub(crate) fn commit(&mut self, id: RecordId) {
        debug_assert_eq!(Some(id), self.last.checked_add(1));
        self.last = id;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_at_zero() {
        let seq = SequenceCounter::new();
        assert_eq!(seq.last_issued(), 0);
        assert_eq!(seq.peek_next().unwrap(), 1);
    }

    #[test]
    fn test_peek_does_not_advance() {
        let seq = SequenceCounter::new();
        assert_eq!(seq.peek_next().unwrap(), 1);
        assert_eq!(seq.peek_next().unwrap(), 1);
    }

    #[test]
    fn test_commit_advances_by_one() {
        let mut seq = SequenceCounter::new();
        for expected in 1..=5 {
            let id = seq.peek_next().unwrap();
            assert_eq!(id, expected);
            seq.commit(id);
        }
        assert_eq!(seq.last_issued(), 5);
    }

    #[test]
    fn test_exhausted_sequence_is_an_error() {
        let seq = SequenceCounter::resume(u64::MAX);
        assert!(matches!(seq.peek_next(), Err(RegistryError::StateUnavailable(_))));
    }
}
