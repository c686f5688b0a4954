//! Merge orchestrator with boundary logging.
//!
//! ## Logging Ownership
//!
//! `merge_history` owns the lifecycle events of a run:
//! - `log_op_start!` at entry
//! - `log_op_end!` on success
//! - `log_op_error!` on failure
//!
//! Stages below it only emit `debug!`/`info!`/`warn!` with a `stage` field.

use serde::Serialize;
use std::time::Instant;

use revline_core_types::RunId;

use crate::config::MergeConfig;
use crate::diff::{interpret, ChangeSummary, DiffReport};
use crate::errors::Result;
use crate::history::{
    annotate_history, build_revision, import_history, AnnotationReport, AssignmentValidator,
    BuildOutcome, ImportReport, MetadataEvidenceValidator,
};
use crate::snapshot::Snapshot;
use crate::{log_op_end, log_op_error, log_op_start};

/// Everything a merge run did, stage by stage
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MergeOutcome {
    pub run_id: RunId,
    pub summary: ChangeSummary,
    pub import: ImportReport,
    pub build: BuildOutcome,
    pub annotation: AnnotationReport,
}

impl MergeOutcome {
    /// Label of the revision recording this run, if qualifying elements were
    /// attached to one
    pub fn revision_label(&self) -> Option<&str> {
        self.build
            .revision_id
            .as_ref()
            .map(|_| self.build.label.as_str())
    }
}

/// Merge the history of `previous` into `current`
///
/// Uses [`MetadataEvidenceValidator`] against `previous` to decide which
/// historical links survive.
///
/// # Errors
///
/// Returns `InvalidConfig` if `config` fails validation, or `Serialization`
/// if a history record cannot be canonicalised. Recoverable failures inside a
/// stage never abort the run; they are logged and counted in the outcome.
///
/// # Example
///
/// ```
/// use revline_core::{merge_history, MergeConfig, Snapshot};
/// use revline_core::diff::DiffReport;
/// use revline_core::model::Element;
///
/// let previous = Snapshot::new();
/// let mut current = Snapshot::new();
/// current.insert_element(Element::new("wall-1", "IfcWall")).unwrap();
///
/// let report = DiffReport {
///     added: vec!["wall-1".to_string()],
///     ..DiffReport::default()
/// };
/// let outcome = merge_history(&previous, &mut current, &report, &MergeConfig::default()).unwrap();
/// assert_eq!(outcome.revision_label(), Some("PM1"));
/// ```
pub fn merge_history(
    previous: &Snapshot,
    current: &mut Snapshot,
    report: &DiffReport,
    config: &MergeConfig,
) -> Result<MergeOutcome> {
    let validator = MetadataEvidenceValidator::new(previous, &config.history_record_name);
    merge_history_with(previous, current, report, config, &validator)
}

/// Merge with a caller-supplied validator for historical links
///
/// # Errors
///
/// Same as [`merge_history`].
pub fn merge_history_with(
    previous: &Snapshot,
    current: &mut Snapshot,
    report: &DiffReport,
    config: &MergeConfig,
    validator: &dyn AssignmentValidator,
) -> Result<MergeOutcome> {
    let run_id = RunId::new();
    log_op_start!("merge_history", run_id = %run_id);
    let start = Instant::now();

    let outcome = merge_history_impl(previous, current, report, config, validator, run_id.clone())
        .map_err(|e| {
            log_op_error!(
                "merge_history",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64,
                run_id = %run_id
            );
            e
        })?;

    log_op_end!(
        "merge_history",
        duration_ms = start.elapsed().as_millis() as u64,
        run_id = %run_id,
        label = outcome.revision_label().unwrap_or("")
    );
    Ok(outcome)
}

fn merge_history_impl(
    previous: &Snapshot,
    current: &mut Snapshot,
    report: &DiffReport,
    config: &MergeConfig,
    validator: &dyn AssignmentValidator,
    run_id: RunId,
) -> Result<MergeOutcome> {
    config.validate()?;

    let patterns = config.ignore_patterns();
    let summary = interpret(report, &patterns);
    let import = import_history(previous, current, validator);
    let build = build_revision(previous, current, &summary, config);
    let annotation = annotate_history(
        previous,
        current,
        &summary,
        build.revision_id.as_deref(),
        config,
    )?;

    Ok(MergeOutcome {
        run_id,
        summary,
        import,
        build,
        annotation,
    })
}
