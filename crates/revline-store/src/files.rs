//! Loading and saving of merge inputs.
//!
//! ## Responsibilities
//!
//! - Read snapshot documents, diff reports and TOML configs from disk
//! - Persist the merged snapshot atomically
//!
//! ## Non-Responsibilities
//!
//! - Interpreting any of the contents (handled by `revline-core`)

use std::fs;
use std::path::Path;

use revline_core::diff::{parse_diff_report, DiffReport};
use revline_core::snapshot::{parse_snapshot, render_snapshot};
use revline_core::{MergeConfig, Snapshot};

use crate::atomic::atomic_write;
use crate::errors::{file_error, io_error, Result};

/// Load a snapshot document
///
/// # Errors
///
/// Returns `Io` if the file cannot be read, `InvalidSnapshot` if it is not a
/// valid snapshot document (bad JSON, duplicate identifiers, dangling
/// relation endpoints, unsupported schema version).
pub fn load_snapshot(path: &Path) -> Result<Snapshot> {
    let bytes = fs::read(path).map_err(|e| io_error("read_snapshot", path, e))?;
    let snapshot = parse_snapshot(&bytes).map_err(|e| file_error("read_snapshot", path, e))?;
    tracing::debug!(
        path = %path.display(),
        elements = snapshot.elements().count(),
        revisions = snapshot.revisions().count(),
        "snapshot loaded"
    );
    Ok(snapshot)
}

/// Write a snapshot document, replacing the file atomically
///
/// # Errors
///
/// Returns `Serialization` if rendering fails or `Io` if the write fails.
pub fn save_snapshot(path: &Path, snapshot: &Snapshot) -> Result<()> {
    let bytes = render_snapshot(snapshot).map_err(|e| file_error("write_snapshot", path, e))?;
    atomic_write(path, &bytes)?;
    tracing::debug!(path = %path.display(), bytes = bytes.len(), "snapshot saved");
    Ok(())
}

/// Load a diff report
///
/// # Errors
///
/// Returns `Io` if the file cannot be read, `InvalidDiffReport` if its
/// structure is invalid.
pub fn load_diff_report(path: &Path) -> Result<DiffReport> {
    let bytes = fs::read(path).map_err(|e| io_error("read_diff_report", path, e))?;
    parse_diff_report(&bytes).map_err(|e| file_error("read_diff_report", path, e))
}

/// Load and validate a TOML merge configuration
///
/// # Errors
///
/// Returns `Io` if the file cannot be read, `InvalidConfig` if parsing or
/// validation fails.
pub fn load_config(path: &Path) -> Result<MergeConfig> {
    let text = fs::read_to_string(path).map_err(|e| io_error("read_config", path, e))?;
    MergeConfig::from_toml_str(&text).map_err(|e| file_error("read_config", path, e))
}
