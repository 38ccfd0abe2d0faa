//! CLI error types
//!
//! Every CLI error ends the process with a non-zero exit code.

use std::fmt;
use std::io;

use crate::snapshot::SnapshotError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration file missing or invalid
    ConfigError,
    /// stdin/stdout failure
    IoError,
    /// `init` on an existing ledger
    AlreadyInitialized,
    /// Any other command before `init`
    NotInitialized,
    /// Snapshot could not be loaded at startup
    BootFailed,
    /// Snapshot could not be written after a mutation
    PersistFailed,
}

impl CliErrorCode {
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "AGRO_CLI_CONFIG_ERROR",
            Self::IoError => "AGRO_CLI_IO_ERROR",
            Self::AlreadyInitialized => "AGRO_CLI_ALREADY_INITIALIZED",
            Self::NotInitialized => "AGRO_CLI_NOT_INITIALIZED",
            Self::BootFailed => "AGRO_CLI_BOOT_FAILED",
            Self::PersistFailed => "AGRO_CLI_PERSIST_FAILED",
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    pub fn already_initialized() -> Self {
        Self::new(CliErrorCode::AlreadyInitialized, "Ledger already initialized")
    }

    pub fn not_initialized() -> Self {
        Self::new(
            CliErrorCode::NotInitialized,
            "Ledger not initialized. Run 'agroledger init' first.",
        )
    }

    pub fn boot_failed(err: &SnapshotError) -> Self {
        Self::new(CliErrorCode::BootFailed, err.to_string())
    }

    pub fn persist_failed(err: &SnapshotError) -> Self {
        Self::new(CliErrorCode::PersistFailed, err.to_string())
    }

    pub fn code(&self) -> &CliErrorCode {
        &self.code
    }

    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::io_error(format!("JSON error: {}", e))
    }
}

pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_code() {
        let err = CliError::not_initialized();
        assert_eq!(err.code(), &CliErrorCode::NotInitialized);
        assert!(err.to_string().starts_with("AGRO_CLI_NOT_INITIALIZED"));
    }

    #[test]
    fn test_snapshot_errors_wrap() {
        let err = CliError::boot_failed(&SnapshotError::invalid_state("bad counter"));
        assert_eq!(err.code_str(), "AGRO_CLI_BOOT_FAILED");
        assert!(err.message().contains("bad counter"));
    }
}
