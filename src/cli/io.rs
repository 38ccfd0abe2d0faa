//! Line-oriented stdin/stdout handling
//!
//! - Input: one JSON request per line, UTF-8
//! - Output: one JSON object per line

use std::io::{self, BufRead, Write};

use serde_json::Value;

use super::errors::{CliError, CliResult};

/// Reads the first non-blank line from stdin
pub fn read_request() -> CliResult<String> {
    read_requests()
        .next()
        .unwrap_or_else(|| Err(CliError::io_error("Empty input")))
}

/// Iterates over non-blank stdin lines
pub fn read_requests() -> impl Iterator<Item = CliResult<String>> {
    io::stdin()
        .lock()
        .lines()
        .filter(|line| line.as_ref().map(|l| !l.trim().is_empty()).unwrap_or(true))
        .map(|line| line.map_err(CliError::from))
}

/// Writes `{"status":"ok","data":...}`
pub fn write_response(data: Value) -> CliResult<()> {
    write_json(&serde_json::json!({ "status": "ok", "data": data }).to_string())
}

/// Writes `{"status":"error","code":...,"message":...}`
pub fn write_error(code: &str, message: &str) -> CliResult<()> {
    write_json(
        &serde_json::json!({ "status": "error", "code": code, "message": message }).to_string(),
    )
}

/// Writes a preformatted JSON line
pub fn write_json(json_str: &str) -> CliResult<()> {
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", json_str)?;
    stdout.flush()?;
    Ok(())
}
