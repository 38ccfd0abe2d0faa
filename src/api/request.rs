//! API request types
//!
//! One JSON object per request. `op` selects the operation and `caller`
//! carries the identity established by the transport:
//!
//! ```json
//! {"op": "transfer", "caller": "farm-17", "record_id": 1, "new_owner": "coop-2"}
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::registry::{Identity, RecordId};

use super::errors::{ApiError, ApiResult};

/// Every recognised `op` value
pub const OPERATIONS: &[&str] = &[
    "create",
    "transfer",
    "grant",
    "revoke",
    "append",
    "modify",
    "verify",
    "delete",
    "restrict",
    "get",
    "has_access",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    Create {
        species: String,
        output_volume: u64,
        site_info: String,
        descriptors: Vec<String>,
    },
    Transfer {
        record_id: RecordId,
        new_owner: Identity,
    },
    Grant {
        record_id: RecordId,
        viewer: Identity,
    },
    Revoke {
        record_id: RecordId,
        viewer: Identity,
    },
    Append {
        record_id: RecordId,
        descriptors: Vec<String>,
    },
    Modify {
        record_id: RecordId,
        species: String,
        output_volume: u64,
        site_info: String,
        descriptors: Vec<String>,
    },
    Verify {
        record_id: RecordId,
        claimed_owner: Identity,
    },
    Delete {
        record_id: RecordId,
    },
    Restrict {
        record_id: RecordId,
    },
    Get {
        record_id: RecordId,
    },
    HasAccess {
        record_id: RecordId,
        viewer: Identity,
    },
}

impl Operation {
    /// Whether a successful run of this operation changes durable state
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            Operation::Create { .. }
                | Operation::Transfer { .. }
                | Operation::Grant { .. }
                | Operation::Revoke { .. }
                | Operation::Append { .. }
                | Operation::Modify { .. }
                | Operation::Delete { .. }
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub caller: Identity,
    pub operation: Operation,
}

impl Request {
    /// Parses a request from a JSON string
    pub fn parse(json: &str) -> ApiResult<Self> {
        let mut value: Value = serde_json::from_str(json)
            .map_err(|e| ApiError::invalid_request(format!("Invalid JSON: {}", e)))?;

        let object = value
            .as_object_mut()
            .ok_or_else(|| ApiError::invalid_request("Request must be a JSON object"))?;

        let op = object
            .get("op")
            .and_then(Value::as_str)
            .ok_or_else(|| ApiError::invalid_request("Missing op"))?
            .to_string();
        if !OPERATIONS.contains(&op.as_str()) {
            return Err(ApiError::unknown_operation(op));
        }

        let caller = object
            .remove("caller")
            .ok_or_else(|| ApiError::invalid_request("Missing caller"))?;
        let caller: Identity = serde_json::from_value(caller)
            .map_err(|e| ApiError::invalid_request(format!("Invalid caller: {}", e)))?;
        if caller.as_str().is_empty() {
            return Err(ApiError::invalid_request("Empty caller"));
        }

        let operation: Operation = serde_json::from_value(value)
            .map_err(|e| ApiError::invalid_request(format!("Invalid '{}' request: {}", op, e)))?;

        Ok(Self { caller, operation })
    }
}
