//! File-level merge runs
//!
//! Loads the previous and current snapshots plus the diff report, runs the
//! engine and writes the current snapshot back in place.

use std::path::Path;
use std::time::Instant;

use revline_core::diff::DiffReport;
use revline_core::{log_op_end, log_op_error, log_op_start};
use revline_core::{merge_history, MergeConfig, MergeOutcome, Snapshot};

use crate::errors::{file_error, Result};
use crate::files::{load_diff_report, load_snapshot, save_snapshot};

/// Input files for one merge run
#[derive(Debug, Clone, Copy)]
pub struct MergePaths<'a> {
    pub previous: &'a Path,
    pub current: &'a Path,
    pub diff_report: &'a Path,
}

/// Merge the previous snapshot's history into the current snapshot file
///
/// The current file is only rewritten when the merge succeeds.
///
/// # Errors
///
/// Returns `Io`, `InvalidSnapshot` or `InvalidDiffReport` when an input
/// cannot be loaded, any engine error from the merge itself, and `Io` if the
/// merged snapshot cannot be written.
pub fn merge_snapshot_files(paths: MergePaths<'_>, config: &MergeConfig) -> Result<MergeOutcome> {
    log_op_start!("merge_snapshot_files", current = %paths.current.display());
    let start = Instant::now();

    let outcome = merge_snapshot_files_impl(paths, config).map_err(|e| {
        log_op_error!(
            "merge_snapshot_files",
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64
        );
        e
    })?;

    log_op_end!(
        "merge_snapshot_files",
        duration_ms = start.elapsed().as_millis() as u64,
        run_id = %outcome.run_id
    );
    Ok(outcome)
}

fn merge_snapshot_files_impl(paths: MergePaths<'_>, config: &MergeConfig) -> Result<MergeOutcome> {
    let previous: Snapshot = load_snapshot(paths.previous)?;
    let mut current: Snapshot = load_snapshot(paths.current)?;
    let report: DiffReport = load_diff_report(paths.diff_report)?;

    let outcome = merge_history(&previous, &mut current, &report, config)
        .map_err(|e| file_error("merge_history", paths.current, e))?;

    save_snapshot(paths.current, &current)?;
    Ok(outcome)
}
