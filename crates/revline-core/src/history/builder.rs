//! Creation of the single revision that records the current run.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use revline_core_types::schema::STAGE_BUILD;

use crate::config::MergeConfig;
use crate::diff::ChangeSummary;
use crate::history::label;
use crate::model::{new_global_id, Assignment, Ordering, Revision};
use crate::snapshot::Snapshot;

/// Status stored on revisions created by the engine
pub const COMPLETED_STATUS: &str = "COMPLETED";

/// What the builder did to the current snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildOutcome {
    /// Identifier of the revision qualifying elements were attached to
    pub revision_id: Option<String>,
    /// Label computed for this run, even when nothing was created
    pub label: String,
    /// Qualifying elements newly linked to the revision
    pub attached: usize,
    /// Qualifying elements that are not present in the current snapshot
    pub skipped_missing: usize,
    /// The revision already existed in the current snapshot (re-run)
    pub reused: bool,
    pub ordering_created: bool,
}

impl BuildOutcome {
    /// A new revision entity was inserted by this run
    pub fn created(&self) -> bool {
        self.revision_id.is_some() && !self.reused
    }
}

/// Fill a description template from the run's label and counts
///
/// Unknown placeholders are left as written.
pub fn render_description(template: &str, label: &str, summary: &ChangeSummary) -> String {
    template
        .replace("{label}", label)
        .replace("{total}", &summary.total().to_string())
        .replace("{added}", &summary.added.to_string())
        .replace("{changed}", &summary.changed.to_string())
        .replace("{skipped}", &summary.skipped.to_string())
        .replace("{deleted}", &summary.deleted.to_string())
}

/// Create the run's revision and attach the qualifying elements to it
///
/// An empty summary is a strict no-op. The label is derived from the
/// previous snapshot only; if the current snapshot already holds a revision
/// with that label, it is reused instead of duplicated.
pub fn build_revision(
    previous: &Snapshot,
    current: &mut Snapshot,
    summary: &ChangeSummary,
    config: &MergeConfig,
) -> BuildOutcome {
    let highest = label::highest_labeled(previous.revisions(), &config.label_prefix);
    let next = label::next_label(previous.revisions(), &config.label_prefix);
    let mut outcome = BuildOutcome {
        label: next.clone(),
        ..BuildOutcome::default()
    };

    if summary.is_empty() {
        tracing::info!(
            stage = STAGE_BUILD,
            label = %next,
            "no meaningful changes; no revision created"
        );
        return outcome;
    }

    let mut present = Vec::new();
    for element_id in summary.element_ids() {
        if current.element(element_id).is_some() {
            present.push(element_id.to_string());
        } else {
            tracing::warn!(
                stage = STAGE_BUILD,
                element_id = %element_id,
                "qualifying element missing from current snapshot; not attached"
            );
            outcome.skipped_missing += 1;
        }
    }
    if present.is_empty() {
        tracing::warn!(
            stage = STAGE_BUILD,
            label = %next,
            "no qualifying element exists in current snapshot; no revision created"
        );
        return outcome;
    }

    let revision_id = match current.revision_by_label(&next) {
        Some(existing) => {
            outcome.reused = true;
            existing.global_id.clone()
        }
        None => {
            let revision = Revision {
                global_id: new_global_id(),
                label: next.clone(),
                name: config.revision_name.clone(),
                status: Some(COMPLETED_STATUS.to_string()),
                description: Some(render_description(
                    &config.description_template,
                    &next,
                    summary,
                )),
                schedule_time: Some(Utc::now().to_rfc3339()),
            };
            let id = revision.global_id.clone();
            if let Err(e) = current.insert_revision(revision) {
                tracing::warn!(
                    stage = STAGE_BUILD,
                    label = %next,
                    error = %e,
                    "failed to create revision"
                );
                return outcome;
            }
            id
        }
    };

    outcome.attached = attach(current, &revision_id, &next, present);

    if let Some((_, prior)) = highest {
        if prior.global_id != revision_id
            && current.revision(&prior.global_id).is_some()
            && !current.has_ordering(&prior.global_id, &revision_id)
        {
            match current.insert_ordering(Ordering::new(
                new_global_id(),
                prior.global_id.clone(),
                revision_id.clone(),
            )) {
                Ok(()) => outcome.ordering_created = true,
                Err(e) => tracing::warn!(
                    stage = STAGE_BUILD,
                    label = %next,
                    error = %e,
                    "failed to create ordering from previous revision"
                ),
            }
        }
    }

    tracing::info!(
        stage = STAGE_BUILD,
        global_id = %revision_id,
        label = %next,
        attached = outcome.attached,
        reused = outcome.reused,
        "revision built"
    );
    outcome.revision_id = Some(revision_id);
    outcome
}

// Extend an assignment already pointing at the revision, or make a new one.
fn attach(
    current: &mut Snapshot,
    revision_id: &str,
    label: &str,
    element_ids: Vec<String>,
) -> usize {
    let existing = current
        .assignments()
        .find(|a| a.revision_id == revision_id)
        .map(|a| a.global_id.clone());

    let result = match existing {
        Some(assignment_id) => current.extend_assignment(&assignment_id, &element_ids),
        None => {
            let count = element_ids.len();
            current
                .insert_assignment(Assignment::new(new_global_id(), revision_id, element_ids))
                .map(|()| count)
        }
    };
    result.unwrap_or_else(|e| {
        tracing::warn!(
            stage = STAGE_BUILD,
            label = %label,
            error = %e,
            "failed to attach qualifying elements"
        );
        0
    })
}
