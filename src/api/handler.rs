//! Request dispatcher
//!
//! Parses a JSON request, runs the matching ledger operation and wraps
//! the outcome in a response. Parsing failures never reach the ledger.

use serde_json::{json, Value};

use crate::ledger::Ledger;
use crate::observability::{Event, Logger};
use crate::registry::RecordFields;

use super::errors::{ApiError, ApiResult};
use super::request::{Operation, Request};
use super::response::Response;

/// Outcome of one dispatched request
#[derive(Debug, Clone, PartialEq)]
pub struct Dispatched {
    pub response: Response,
    /// True when the request changed durable state
    pub mutated: bool,
}

pub struct ApiHandler<'a> {
    ledger: &'a Ledger,
}

impl<'a> ApiHandler<'a> {
    pub fn new(ledger: &'a Ledger) -> Self {
        Self { ledger }
    }

    /// Handles one raw JSON request line
    pub fn handle(&self, json_request: &str) -> Dispatched {
        let request = match Request::parse(json_request) {
            Ok(r) => r,
            Err(e) => {
                Logger::warn(
                    Event::RequestInvalid,
                    &[("code", e.code()), ("message", e.message())],
                );
                return Dispatched {
                    response: Response::error(&e),
                    mutated: false,
                };
            }
        };

        let is_mutation = request.operation.is_mutation();
        match self.execute(request) {
            Ok(data) => Dispatched {
                response: Response::success(data),
                mutated: is_mutation,
            },
            Err(e) => Dispatched {
                response: Response::error(&e),
                mutated: false,
            },
        }
    }

    /// Runs a parsed request against the ledger
    pub fn execute(&self, request: Request) -> ApiResult<Value> {
        let caller = &request.caller;
        let ledger = self.ledger;

        let data = match request.operation {
            Operation::Create {
                species,
                output_volume,
                site_info,
                descriptors,
            } => {
                let fields = RecordFields::new(species, output_volume, site_info, descriptors);
                let record_id = ledger.create_production_record(caller, fields)?;
                json!({ "record_id": record_id })
            }
            Operation::Transfer {
                record_id,
                new_owner,
            } => {
                ledger.transfer_production_ownership(caller, record_id, &new_owner)?;
                Value::Bool(true)
            }
            Operation::Grant { record_id, viewer } => {
                ledger.grant_viewing_access(caller, record_id, &viewer)?;
                Value::Bool(true)
            }
            Operation::Revoke { record_id, viewer } => {
                ledger.revoke_viewing_access(caller, record_id, &viewer)?;
                Value::Bool(true)
            }
            Operation::Append {
                record_id,
                descriptors,
            } => {
                let merged = ledger.append_metadata_descriptors(caller, record_id, descriptors)?;
                json!(merged)
            }
            Operation::Modify {
                record_id,
                species,
                output_volume,
                site_info,
                descriptors,
            } => {
                let fields = RecordFields::new(species, output_volume, site_info, descriptors);
                ledger.modify_production_record(caller, record_id, fields)?;
                Value::Bool(true)
            }
            Operation::Verify {
                record_id,
                claimed_owner,
            } => {
                let result =
                    ledger.verify_production_authenticity(caller, record_id, &claimed_owner)?;
                to_value(&result)?
            }
            Operation::Delete { record_id } => {
                ledger.delete_production_record(caller, record_id)?;
                Value::Bool(true)
            }
            Operation::Restrict { record_id } => {
                ledger.apply_emergency_restriction(caller, record_id)?;
                Value::Bool(true)
            }
            Operation::Get { record_id } => {
                let record = ledger.get_production_record(record_id)?;
                to_value(&record)?
            }
            Operation::HasAccess { record_id, viewer } => {
                Value::Bool(ledger.has_viewing_access(record_id, &viewer)?)
            }
        };

        Ok(data)
    }
}

fn to_value<T: serde::Serialize>(value: &T) -> ApiResult<Value> {
    serde_json::to_value(value)
        .map_err(|e| ApiError::invalid_request(format!("Failed to encode response: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::registry::Identity;
    use std::sync::Arc;

    fn ledger() -> Ledger {
        Ledger::builder(Identity::from("controller"))
            .clock(Arc::new(ManualClock::new(10)))
            .build()
    }

    const CREATE: &str = r#"{"op":"create","caller":"p1","species":"Wheat","output_volume":5000,"site_info":"Field A, County X","descriptors":["organic"]}"#;

    #[test]
    fn test_create_returns_id_and_mutates() {
        let ledger = ledger();
        let handler = ApiHandler::new(&ledger);

        let out = handler.handle(CREATE);
        assert!(out.mutated);
        assert_eq!(out.response, Response::success(json!({"record_id": 1})));
    }

    #[test]
    fn test_rejected_mutation_is_not_mutated() {
        let ledger = ledger();
        let handler = ApiHandler::new(&ledger);
        handler.handle(CREATE);

        let out = handler.handle(r#"{"op":"delete","caller":"p2","record_id":1}"#);
        assert!(!out.mutated);
        assert_eq!(out.response.error_code(), Some("AGRO_OWNERSHIP_MISMATCH"));
    }

    #[test]
    fn test_verify_response_shape() {
        let ledger = ledger();
        let handler = ApiHandler::new(&ledger);
        handler.handle(CREATE);

        let out = handler.handle(r#"{"op":"verify","caller":"p1","record_id":1,"claimed_owner":"p1"}"#);
        assert!(!out.mutated);
        match out.response {
            Response::Success(s) => {
                assert_eq!(s.data["is_authentic"], true);
                assert_eq!(s.data["match"], true);
                assert_eq!(s.data["age"], 0);
                assert_eq!(s.data["current_time"], 10);
            }
            other => panic!("unexpected response {:?}", other),
        }
    }

    #[test]
    fn test_append_returns_merged_list() {
        let ledger = ledger();
        let handler = ApiHandler::new(&ledger);
        handler.handle(CREATE);

        let out = handler.handle(
            r#"{"op":"append","caller":"p1","record_id":1,"descriptors":["dried","graded"]}"#,
        );
        assert_eq!(
            out.response,
            Response::success(json!(["organic", "dried", "graded"]))
        );
    }

    #[test]
    fn test_parse_errors_never_touch_ledger() {
        let ledger = ledger();
        let handler = ApiHandler::new(&ledger);

        let out = handler.handle(r#"{"op":"create","caller":"p1"}"#);
        assert_eq!(out.response.error_code(), Some("AGRO_INVALID_REQUEST"));
        assert_eq!(ledger.last_issued_id().unwrap(), 0);
        assert_eq!(ledger.metrics().operations_rejected, 0);
    }

    #[test]
    fn test_get_and_has_access() {
        let ledger = ledger();
        let handler = ApiHandler::new(&ledger);
        handler.handle(CREATE);

        let out = handler.handle(r#"{"op":"get","caller":"anyone","record_id":1}"#);
        match out.response {
            Response::Success(s) => assert_eq!(s.data["species"], "Wheat"),
            other => panic!("unexpected response {:?}", other),
        }

        let out = handler.handle(r#"{"op":"has_access","caller":"anyone","record_id":1,"viewer":"p1"}"#);
        assert_eq!(out.response, Response::success(Value::Bool(true)));
    }
}
