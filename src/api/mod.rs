//! JSON request API
//!
//! Thin translation between line-oriented JSON and ledger operations.
//! Registry error codes are passed through unchanged.
//!
//! # Operations
//!
//! - create, modify, append, transfer, delete (owner writes)
//! - grant, revoke (owner-managed viewer access)
//! - verify (owner, grantee or controller)
//! - restrict (controller or owner)
//! - get, has_access (direct lookups)

mod errors;
mod handler;
mod request;
mod response;

pub use errors::{ApiError, ApiErrorCode, ApiResult};
pub use handler::{ApiHandler, Dispatched};
pub use request::{Operation, Request, OPERATIONS};
pub use response::{ErrorResponse, Response, SuccessResponse};
