//! Configuration file
//!
//! ```json
//! {
//!   "data_dir": "/var/lib/agroledger",
//!   "controller": "registry-admin",
//!   "snapshot_file": "ledger.snapshot.json",
//!   "autosave": true,
//!   "audit_log": "audit.jsonl",
//!   "log_level": "INFO"
//! }
//! ```
//!
//! Relative `snapshot_file` and `audit_log` names resolve inside `data_dir`.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::observability::Severity;
use crate::registry::Identity;
use crate::validation::string_in_bounds;

use super::errors::{CliError, CliResult};

const MAX_CONTROLLER_LEN: usize = 128;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Data directory (required)
    pub data_dir: String,

    /// System controller identity (required)
    pub controller: String,

    /// Snapshot file name (optional, default "ledger.snapshot.json")
    #[serde(default = "default_snapshot_file")]
    pub snapshot_file: String,

    /// Write a snapshot after every successful mutation (optional, default true)
    #[serde(default = "default_autosave")]
    pub autosave: bool,

    /// Audit trail file (optional, disabled when absent)
    #[serde(default)]
    pub audit_log: Option<String>,

    /// Minimum log severity (optional, default "INFO")
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_snapshot_file() -> String {
    "ledger.snapshot.json".to_string()
}

fn default_autosave() -> bool {
    true
}

fn default_log_level() -> String {
    "INFO".to_string()
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        Self::from_json(&content)
    }

    /// Parse and validate configuration JSON
    pub fn from_json(content: &str) -> CliResult<Self> {
        let config: Config = serde_json::from_str(content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> CliResult<()> {
        if self.data_dir.trim().is_empty() {
            return Err(CliError::config_error("data_dir must not be empty"));
        }

        if !string_in_bounds(&self.controller, 1, MAX_CONTROLLER_LEN) {
            return Err(CliError::config_error(format!(
                "controller must be 1..={} bytes, got {}",
                MAX_CONTROLLER_LEN,
                self.controller.len()
            )));
        }

        if self.snapshot_file.trim().is_empty() {
            return Err(CliError::config_error("snapshot_file must not be empty"));
        }

        if matches!(&self.audit_log, Some(name) if name.trim().is_empty()) {
            return Err(CliError::config_error("audit_log must not be empty when set"));
        }

        self.severity()?;

        Ok(())
    }

    pub fn data_path(&self) -> &Path {
        Path::new(&self.data_dir)
    }

    pub fn snapshot_path(&self) -> PathBuf {
        self.data_path().join(&self.snapshot_file)
    }

    pub fn audit_path(&self) -> Option<PathBuf> {
        self.audit_log.as_ref().map(|name| self.data_path().join(name))
    }

    pub fn controller_identity(&self) -> Identity {
        Identity::new(self.controller.clone())
    }

    pub fn severity(&self) -> CliResult<Severity> {
        self.log_level
            .parse()
            .map_err(|e: String| CliError::config_error(format!("Invalid log_level: {}", e)))
    }

    /// A ledger is initialized once its snapshot file exists
    pub fn is_initialized(&self) -> bool {
        self.snapshot_path().exists()
    }
}
