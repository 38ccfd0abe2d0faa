//! # Ledger
//!
//! The public operation surface. Each call takes the caller identity
//! explicitly, reads the injected clock, and runs as one atomic unit of
//! work against the record store and access matrix.

mod engine;
mod state;

pub use engine::{Ledger, LedgerBuilder};
pub use state::StateImage;
