//! agroledger - an agricultural production record registry
//!
//! Producers register production events, transfer ownership, manage
//! viewer access and let third parties verify authenticity claims.

pub mod api;
pub mod cli;
pub mod clock;
pub mod ledger;
pub mod observability;
pub mod registry;
pub mod snapshot;
pub mod validation;

pub use ledger::{Ledger, LedgerBuilder, StateImage};
pub use registry::{
    AuthenticityResult, Identity, ProductionRecord, RecordFields, RecordId, RegistryError,
    RegistryResult,
};
