//! Snapshot error types
//!
//! Error codes:
//! - AGRO_SNAPSHOT_IO: file could not be read, written or synced
//! - AGRO_SNAPSHOT_FORMAT: not a snapshot, or an unsupported version
//! - AGRO_SNAPSHOT_CHECKSUM: payload does not match its checksum
//! - AGRO_SNAPSHOT_INVALID_STATE: payload breaks a record or counter invariant
//!
//! A snapshot that fails to load is never partially applied; the caller
//! refuses to start.

use std::fmt;
use std::io;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotErrorCode {
    AgroSnapshotIo,
    AgroSnapshotFormat,
    AgroSnapshotChecksum,
    AgroSnapshotInvalidState,
}

impl SnapshotErrorCode {
    pub fn code(&self) -> &'static str {
        match self {
            SnapshotErrorCode::AgroSnapshotIo => "AGRO_SNAPSHOT_IO",
            SnapshotErrorCode::AgroSnapshotFormat => "AGRO_SNAPSHOT_FORMAT",
            SnapshotErrorCode::AgroSnapshotChecksum => "AGRO_SNAPSHOT_CHECKSUM",
            SnapshotErrorCode::AgroSnapshotInvalidState => "AGRO_SNAPSHOT_INVALID_STATE",
        }
    }

    /// Whether the stored data itself is bad, as opposed to the disk
    pub fn is_corruption(&self) -> bool {
        !matches!(self, SnapshotErrorCode::AgroSnapshotIo)
    }
}

impl fmt::Display for SnapshotErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[derive(Debug)]
pub struct SnapshotError {
    code: SnapshotErrorCode,
    message: String,
    source: Option<io::Error>,
}

impl SnapshotError {
    pub fn io_error_at_path(path: &Path, source: io::Error) -> Self {
        Self {
            code: SnapshotErrorCode::AgroSnapshotIo,
            message: format!("I/O error at path: {}", path.display()),
            source: Some(source),
        }
    }

    pub fn format_error(message: impl Into<String>) -> Self {
        Self {
            code: SnapshotErrorCode::AgroSnapshotFormat,
            message: message.into(),
            source: None,
        }
    }

    pub fn checksum_mismatch(expected: &str, actual: &str) -> Self {
        Self {
            code: SnapshotErrorCode::AgroSnapshotChecksum,
            message: format!("checksum mismatch: stored {}, computed {}", expected, actual),
            source: None,
        }
    }

    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self {
            code: SnapshotErrorCode::AgroSnapshotInvalidState,
            message: message.into(),
            source: None,
        }
    }

    pub fn code(&self) -> SnapshotErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_corruption(&self) -> bool {
        self.code.is_corruption()
    }
}

impl fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)?;
        if let Some(ref source) = self.source {
            write!(f, " (caused by: {})", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for SnapshotError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|e| e as &(dyn std::error::Error + 'static))
    }
}

pub type SnapshotResult<T> = Result<T, SnapshotError>;
