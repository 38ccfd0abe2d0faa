//! CLI module for AgroLedger
//!
//! Provides command-line interface for:
//! - init: Create data directory and empty snapshot
//! - serve: Load ledger and process request lines until EOF
//! - exec: One-shot request execution
//! - inspect: Print counter, record count and metrics

mod args;
mod commands;
mod config;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{exec, init, inspect, run, run_command, serve};
pub use config::Config;
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{read_request, write_error, write_response};
