//! API error types
//!
//! Request-level failures get their own codes; registry errors pass
//! through with their original code.

use std::fmt;

use crate::registry::RegistryError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorCode {
    /// Malformed JSON or missing/ill-typed fields
    AgroInvalidRequest,
    /// `op` names no known operation
    AgroUnknownOperation,
    /// Error raised by the ledger
    PassThrough,
}

impl ApiErrorCode {
    pub fn code(&self) -> &'static str {
        match self {
            ApiErrorCode::AgroInvalidRequest => "AGRO_INVALID_REQUEST",
            ApiErrorCode::AgroUnknownOperation => "AGRO_UNKNOWN_OPERATION",
            ApiErrorCode::PassThrough => "PASS_THROUGH",
        }
    }
}

impl fmt::Display for ApiErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// Original error code string (from the registry or the API)
    code: String,
    message: String,
}

impl ApiError {
    pub fn invalid_request(reason: impl Into<String>) -> Self {
        Self {
            code: ApiErrorCode::AgroInvalidRequest.code().to_string(),
            message: reason.into(),
        }
    }

    pub fn unknown_operation(op: impl Into<String>) -> Self {
        Self {
            code: ApiErrorCode::AgroUnknownOperation.code().to_string(),
            message: format!("Unknown operation: {}", op.into()),
        }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<RegistryError> for ApiError {
    fn from(err: RegistryError) -> Self {
        Self {
            code: err.code().to_string(),
            message: err.to_string(),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_error_codes() {
        assert_eq!(ApiError::invalid_request("x").code(), "AGRO_INVALID_REQUEST");
        let err = ApiError::unknown_operation("harvest");
        assert_eq!(err.code(), "AGRO_UNKNOWN_OPERATION");
        assert!(err.message().contains("harvest"));
    }

    #[test]
    fn test_registry_error_passes_through() {
        let err = ApiError::from(RegistryError::RecordNotFound(9));
        assert_eq!(err.code(), "AGRO_RECORD_NOT_FOUND");
        assert!(err.message().contains('9'));
    }
}
