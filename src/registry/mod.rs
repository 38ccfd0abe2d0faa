//! # Record Registry
//!
//! Production records, the id sequence and the viewer access matrix.
//!
//! ## Invariants
//! - Record ids are unique, strictly increasing and never reused
//! - `created_at` is written once at creation
//! - Every stored record satisfies the field bounds of `validation`
//! - Only the current owner mutates a record or its grants

pub mod access;
pub mod errors;
pub mod hooks;
pub mod record;
pub mod sequence;
pub mod store;

pub use access::{AccessGrant, AccessMatrix};
pub use errors::{RegistryError, RegistryResult};
pub use hooks::{NoopHooks, RecordHooks};
pub use record::{AuthenticityResult, Identity, ProductionRecord, RecordFields, RecordId};
pub use sequence::SequenceCounter;
pub use store::RecordStore;
