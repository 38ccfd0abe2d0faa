//! Snapshot persistence
//!
//! Writes and reads the durable ledger triple as a single checksummed
//! JSON file.
//!
//! Write protocol:
//! 1. Seal the state image with its checksum
//! 2. Write `<file>.tmp` and fsync it
//! 3. Rename over `<file>` and fsync the directory
//!
//! A crash at any point leaves either the old or the new snapshot in
//! place, never a torn one.

pub mod checksum;
mod envelope;
mod errors;

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::ledger::StateImage;
use crate::observability::{log_event, Event};

pub use envelope::{validate_state, SnapshotEnvelope, FORMAT_VERSION};
pub use errors::{SnapshotError, SnapshotErrorCode, SnapshotResult};

/// Writes `state` to `path` atomically.
pub fn write_snapshot(path: &Path, state: StateImage) -> SnapshotResult<()> {
    let records = state.records.len().to_string();
    let last_id = state.last_id.to_string();
    let json = SnapshotEnvelope::seal(state)?.to_json()?;

    let tmp = temp_path(path);
    {
        let mut file = File::create(&tmp).map_err(|e| SnapshotError::io_error_at_path(&tmp, e))?;
        file.write_all(json.as_bytes())
            .map_err(|e| SnapshotError::io_error_at_path(&tmp, e))?;
        file.sync_all()
            .map_err(|e| SnapshotError::io_error_at_path(&tmp, e))?;
    }

    fs::rename(&tmp, path).map_err(|e| SnapshotError::io_error_at_path(path, e))?;
    sync_parent(path)?;

    let path_text = path.display().to_string();
    log_event(
        Event::SnapshotWritten,
        &[
            ("last_id", last_id.as_str()),
            ("path", path_text.as_str()),
            ("records", records.as_str()),
        ],
    );
    Ok(())
}

/// Reads and validates the snapshot at `path`.
pub fn read_snapshot(path: &Path) -> SnapshotResult<StateImage> {
    let json = fs::read_to_string(path).map_err(|e| SnapshotError::io_error_at_path(path, e))?;
    let path_text = path.display().to_string();

    match SnapshotEnvelope::open(&json) {
        Ok(state) => {
            let records = state.records.len().to_string();
            log_event(
                Event::SnapshotLoaded,
                &[
                    ("path", path_text.as_str()),
                    ("records", records.as_str()),
                ],
            );
            Ok(state)
        }
        Err(e) => {
            let message = e.to_string();
            log_event(
                Event::SnapshotCorrupt,
                &[
                    ("error", message.as_str()),
                    ("path", path_text.as_str()),
                ],
            );
            Err(e)
        }
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(unix)]
fn sync_parent(path: &Path) -> SnapshotResult<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    File::open(parent)
        .and_then(|dir| dir.sync_all())
        .map_err(|e| SnapshotError::io_error_at_path(parent, e))
}

#[cfg(not(unix))]
fn sync_parent(_path: &Path) -> SnapshotResult<()> {
    Ok(())
}
