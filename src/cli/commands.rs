//! CLI command implementations
//!
//! Boot sequence shared by `serve`, `exec` and `inspect`:
//! 1. Configuration load
//! 2. Log level applied
//! 3. Snapshot load and validation
//! 4. Ledger construction (system clock, optional audit file)
//!
//! A snapshot that fails validation stops the boot. Nothing is served
//! from a corrupt ledger.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde_json::json;

use crate::api::ApiHandler;
use crate::clock::SystemClock;
use crate::ledger::{Ledger, StateImage};
use crate::observability::{log_event, AuditOutcome, AuditRecord, Event, FileAuditLog, Logger};
use crate::snapshot::{read_snapshot, write_snapshot};

use super::args::Command;
use super::config::Config;
use super::errors::{CliError, CliResult};
use super::io::{read_request, read_requests, write_error, write_json, write_response};

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Init { config } => init(&config),
        Command::Serve { config } => serve(&config),
        Command::Exec { config } => exec(&config),
        Command::Inspect { config } => inspect(&config),
    }
}

/// Create the data directory and write an empty snapshot
///
/// Refuses to touch an existing ledger.
pub fn init(config_path: &Path) -> CliResult<()> {
    let config = load_config(config_path)?;
    let snapshot_path = initialize(&config)?;

    let path_text = snapshot_path.display().to_string();
    log_event(Event::LedgerInitialized, &[("path", path_text.as_str())]);
    write_response(json!({ "initialized": true, "snapshot": path_text }))?;

    Ok(())
}

/// Load the ledger and answer stdin request lines until EOF
///
/// With `autosave` every successful mutation is persisted before its
/// response is written. Without it the ledger is persisted once at EOF.
pub fn serve(config_path: &Path) -> CliResult<()> {
    let config = load_config(config_path)?;
    let ledger = boot(&config)?;
    let mut dirty = false;

    for request_result in read_requests() {
        match request_result {
            Ok(line) => {
                let (response, mutated) = process_line(&ledger, &config, &line)?;
                dirty |= mutated && !config.autosave;
                write_json(&response)?;
            }
            Err(e) => {
                // I/O error reading - this is fatal
                write_error(e.code_str(), e.message())?;
                break;
            }
        }
    }

    if dirty {
        persist(&ledger, &config)?;
    }

    log_event(Event::Shutdown, &[]);
    Ok(())
}

/// Execute a single request from stdin and exit
///
/// A mutating request is always persisted, regardless of `autosave`.
pub fn exec(config_path: &Path) -> CliResult<()> {
    let config = load_config(config_path)?;
    let ledger = boot(&config)?;

    let line = read_request()?;
    let dispatched = ApiHandler::new(&ledger).handle(&line);
    if dispatched.mutated {
        persist(&ledger, &config)?;
    }

    write_json(&dispatched.response.to_json())?;
    Ok(())
}

/// Print the id counter, record count and metrics as JSON
pub fn inspect(config_path: &Path) -> CliResult<()> {
    let config = load_config(config_path)?;
    let ledger = boot(&config)?;

    let image = ledger
        .export_state()
        .map_err(|e| CliError::io_error(e.to_string()))?;

    write_response(json!({
        "controller": ledger.controller(),
        "last_id": image.last_id,
        "records": image.records.len(),
        "grants": image.grants.len(),
        "metrics": ledger.metrics(),
    }))?;

    Ok(())
}

fn load_config(config_path: &Path) -> CliResult<Config> {
    let config = Config::load(config_path)?;
    Logger::set_min_severity(config.severity()?);

    log_event(Event::ConfigLoaded, &[("data_dir", config.data_dir.as_str())]);
    Ok(config)
}

/// Creates the data directory and the empty snapshot. Returns the
/// snapshot path.
pub(crate) fn initialize(config: &Config) -> CliResult<std::path::PathBuf> {
    if config.is_initialized() {
        return Err(CliError::already_initialized());
    }

    fs::create_dir_all(config.data_path()).map_err(|e| {
        CliError::config_error(format!(
            "Failed to create directory {:?}: {}",
            config.data_path(),
            e
        ))
    })?;

    let snapshot_path = config.snapshot_path();
    write_snapshot(&snapshot_path, StateImage::default())
        .map_err(|e| CliError::persist_failed(&e))?;

    Ok(snapshot_path)
}

/// Loads the snapshot and builds the ledger.
pub(crate) fn boot(config: &Config) -> CliResult<Ledger> {
    log_event(Event::BootStart, &[]);

    if !config.is_initialized() {
        return Err(CliError::not_initialized());
    }

    let image = read_snapshot(&config.snapshot_path()).map_err(|e| CliError::boot_failed(&e))?;

    // Never stamp below what the restored ledger has already seen
    let clock = SystemClock::resume(image.latest_created_at());

    let mut builder = Ledger::builder(config.controller_identity())
        .clock(Arc::new(clock))
        .state(image);

    if let Some(audit_path) = config.audit_path() {
        let audit = FileAuditLog::open(&audit_path).map_err(|e| {
            CliError::config_error(format!(
                "Failed to open audit log {:?}: {}",
                audit_path, e
            ))
        })?;
        builder = builder.audit_log(Arc::new(audit));
    }

    let ledger = builder.build();

    let records = ledger
        .record_count()
        .map_err(|e| CliError::io_error(e.to_string()))?
        .to_string();
    log_event(Event::BootComplete, &[("records", records.as_str())]);

    Ok(ledger)
}

/// Dispatches one request line and autosaves when it mutated the ledger.
///
/// Returns the response line and whether state changed.
pub(crate) fn process_line(
    ledger: &Ledger,
    config: &Config,
    line: &str,
) -> CliResult<(String, bool)> {
    let dispatched = ApiHandler::new(ledger).handle(line);

    if dispatched.mutated && config.autosave {
        persist(ledger, config)?;
    }

    Ok((dispatched.response.to_json(), dispatched.mutated))
}

fn persist(ledger: &Ledger, config: &Config) -> CliResult<()> {
    let image = ledger
        .export_state()
        .map_err(|e| CliError::io_error(e.to_string()))?;

    write_snapshot(&config.snapshot_path(), image).map_err(|e| {
        let err = CliError::persist_failed(&e);
        ledger.append_audit(
            &AuditRecord::new("persist_snapshot", ledger.controller(), AuditOutcome::Rejected)
                .with_error_code(err.code_str()),
        );
        err
    })
}
