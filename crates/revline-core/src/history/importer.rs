//! Carry prior history into the freshly regenerated snapshot.
//!
//! Revisions are cloned with their persistent identifiers, so an entity that
//! already exists in the current snapshot is reused rather than duplicated.
//! Each historical (revision, element) link passes through an
//! [`AssignmentValidator`] before it is recreated. A single failing clone is
//! logged and counted; the import always runs to completion.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use revline_core_types::schema::{STAGE_IMPORT, STAGE_VALIDATE};

use crate::history::validator::{AssignmentValidator, RejectReason, Verdict};
use crate::model::{Assignment, Ordering};
use crate::snapshot::{EntityKind, Snapshot};

/// A historical link the validator refused to carry forward
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectedLink {
    pub revision_id: String,
    pub label: String,
    pub element_id: String,
    pub reason: RejectReason,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportReport {
    pub revisions_cloned: usize,
    pub revisions_reused: usize,
    pub revisions_failed: usize,

    pub orderings_cloned: usize,
    /// Edge already present in the current snapshot
    pub orderings_existing: usize,
    /// An endpoint revision is not available in the current snapshot
    pub orderings_skipped: usize,
    pub orderings_failed: usize,

    pub links_accepted: usize,
    pub links_rejected: usize,
    /// Accepted links whose element no longer exists in the current snapshot
    pub links_orphaned: usize,
    pub links_failed: usize,

    pub rejected: Vec<RejectedLink>,
}

/// Clone revisions, orderings and validated assignments from `previous` into
/// `current`
///
/// `previous` is never mutated. Running the import twice against the same
/// `current` leaves it unchanged the second time.
pub fn import_history(
    previous: &Snapshot,
    current: &mut Snapshot,
    validator: &dyn AssignmentValidator,
) -> ImportReport {
    let mut report = ImportReport::default();

    clone_revisions(previous, current, &mut report);
    clone_orderings(previous, current, &mut report);
    clone_assignments(previous, current, validator, &mut report);

    tracing::info!(
        stage = STAGE_IMPORT,
        revisions_cloned = report.revisions_cloned,
        revisions_reused = report.revisions_reused,
        revisions_failed = report.revisions_failed,
        orderings_cloned = report.orderings_cloned,
        links_accepted = report.links_accepted,
        links_rejected = report.links_rejected,
        links_failed = report.links_failed,
        "history imported"
    );
    report
}

fn clone_revisions(previous: &Snapshot, current: &mut Snapshot, report: &mut ImportReport) {
    for revision in previous.revisions() {
        match current.entity_kind(&revision.global_id) {
            Some(EntityKind::Revision) => {
                report.revisions_reused += 1;
                continue;
            }
            Some(other) => {
                tracing::warn!(
                    stage = STAGE_IMPORT,
                    global_id = %revision.global_id,
                    label = %revision.label,
                    existing = ?other,
                    "revision identifier is taken by another entity; not cloned"
                );
                report.revisions_failed += 1;
                continue;
            }
            None => {}
        }

        match current.insert_revision(revision.clone()) {
            Ok(()) => report.revisions_cloned += 1,
            Err(e) => {
                tracing::warn!(
                    stage = STAGE_IMPORT,
                    global_id = %revision.global_id,
                    label = %revision.label,
                    error = %e,
                    "failed to clone revision"
                );
                report.revisions_failed += 1;
            }
        }
    }
}

fn clone_orderings(previous: &Snapshot, current: &mut Snapshot, report: &mut ImportReport) {
    for ordering in previous.orderings() {
        let both_present = current.revision(&ordering.predecessor_id).is_some()
            && current.revision(&ordering.successor_id).is_some();
        if !both_present {
            tracing::debug!(
                stage = STAGE_IMPORT,
                global_id = %ordering.global_id,
                "ordering endpoint missing in current snapshot; skipped"
            );
            report.orderings_skipped += 1;
            continue;
        }
        if current.has_ordering(&ordering.predecessor_id, &ordering.successor_id) {
            report.orderings_existing += 1;
            continue;
        }

        let cloned = Ordering::new(
            ordering.global_id.clone(),
            ordering.predecessor_id.clone(),
            ordering.successor_id.clone(),
        );
        match current.insert_ordering(cloned) {
            Ok(()) => report.orderings_cloned += 1,
            Err(e) => {
                tracing::warn!(
                    stage = STAGE_IMPORT,
                    global_id = %ordering.global_id,
                    error = %e,
                    "failed to clone ordering"
                );
                report.orderings_failed += 1;
            }
        }
    }
}

fn clone_assignments(
    previous: &Snapshot,
    current: &mut Snapshot,
    validator: &dyn AssignmentValidator,
    report: &mut ImportReport,
) {
    for assignment in previous.assignments() {
        let Some(revision) = previous.revision(&assignment.revision_id) else {
            continue;
        };
        if current.revision(&revision.global_id).is_none() {
            tracing::warn!(
                stage = STAGE_IMPORT,
                global_id = %assignment.global_id,
                label = %revision.label,
                "assignment revision was not cloned; links dropped"
            );
            report.links_failed += assignment.element_ids.len();
            continue;
        }

        let mut accepted = Vec::new();
        let mut seen = HashSet::new();
        for element_id in &assignment.element_ids {
            match validator.check(&revision.label, element_id) {
                Verdict::Accepted => {}
                Verdict::Rejected(reason) => {
                    tracing::info!(
                        stage = STAGE_VALIDATE,
                        label = %revision.label,
                        element_id = %element_id,
                        reason = reason.as_str(),
                        "historical link rejected"
                    );
                    report.links_rejected += 1;
                    report.rejected.push(RejectedLink {
                        revision_id: revision.global_id.clone(),
                        label: revision.label.clone(),
                        element_id: element_id.clone(),
                        reason,
                    });
                    continue;
                }
            }
            if current.element(element_id).is_none() {
                tracing::debug!(
                    stage = STAGE_IMPORT,
                    label = %revision.label,
                    element_id = %element_id,
                    "element no longer exists; link dropped"
                );
                report.links_orphaned += 1;
                continue;
            }
            if seen.insert(element_id.as_str()) {
                accepted.push(element_id.clone());
            }
        }

        if accepted.is_empty() {
            continue;
        }
        let count = accepted.len();
        let result = if current.assignment(&assignment.global_id).is_some() {
            current.extend_assignment(&assignment.global_id, &accepted).map(|_| ())
        } else {
            current.insert_assignment(Assignment::new(
                assignment.global_id.clone(),
                revision.global_id.clone(),
                accepted,
            ))
        };
        match result {
            Ok(()) => report.links_accepted += count,
            Err(e) => {
                tracing::warn!(
                    stage = STAGE_IMPORT,
                    global_id = %assignment.global_id,
                    label = %revision.label,
                    error = %e,
                    "failed to clone assignment"
                );
                report.links_failed += count;
            }
        }
    }
}
