//! Rebuild of every assigned element's history record.
//!
//! Records owned by the engine are never patched: all of them are removed and
//! recomputed each run. Elements whose rebuilt maps are identical share one
//! record, identified by the map's content signature.
//!
//! ## Record layout
//!
//! - one entry per revision label: what changed for the element in it
//! - [`HISTORY_KEY`]: labels oldest first, joined with `", "`
//! - [`LATEST_KEY`]: the most recent label

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, HashMap};

use revline_core_types::schema::STAGE_ANNOTATE;

use crate::config::MergeConfig;
use crate::diff::{ChangeSummary, ElementChange};
use crate::errors::Result;
use crate::history::sorter::chronological_order;
use crate::history::validator::GENERIC_FALLBACK;
use crate::model::{MetadataAttachment, MetadataRecord, Ordering};
use crate::snapshot::Snapshot;

pub const HISTORY_KEY: &str = "History";
pub const LATEST_KEY: &str = "LatestRevision";

/// An (element, label) pair that had no description and got the placeholder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FallbackEntry {
    pub element_id: String,
    pub label: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationReport {
    pub elements_annotated: usize,
    pub records_created: usize,
    pub records_removed: usize,
    /// Elements that could not receive their rebuilt record
    pub elements_failed: usize,
    pub cycles_broken: usize,
    /// Revisions labeled like a history key, left out of the record
    pub reserved_labels_skipped: usize,
    pub fallbacks: Vec<FallbackEntry>,
}

/// Canonical content signature of a record's properties
///
/// Keys are sorted, so two maps with equal contents always have equal
/// signatures regardless of how they were built.
pub fn history_signature(properties: &BTreeMap<String, String>) -> Result<String> {
    let canonical = serde_json::to_string(properties)?;
    Ok(hash_string(&canonical))
}

fn hash_string(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}

// Content-addressed ids keep re-runs byte-identical.
fn record_id(record_name: &str, signature: &str) -> String {
    format!("{}:{}", record_name, &signature[..32])
}

fn attachment_id(record_id: &str) -> String {
    format!("{}:attach", record_id)
}

struct Group {
    properties: BTreeMap<String, String>,
    element_ids: Vec<String>,
}

/// Remove and rebuild the history records of `current`
///
/// `new_revision_id` is the revision the current run built, if any. Its entry
/// for a qualifying element takes the description from `summary`; every other
/// entry is copied verbatim from `previous`. Missing descriptions get
/// [`GENERIC_FALLBACK`] and a warning.
///
/// # Errors
///
/// Returns `Serialization` if a property map cannot be canonicalised.
pub fn annotate_history(
    previous: &Snapshot,
    current: &mut Snapshot,
    summary: &ChangeSummary,
    new_revision_id: Option<&str>,
    config: &MergeConfig,
) -> Result<AnnotationReport> {
    let record_name = config.history_record_name.as_str();
    let mut report = AnnotationReport {
        records_removed: current.remove_metadata_records_named(record_name),
        ..AnnotationReport::default()
    };

    let previous_records = previous.metadata_by_element(record_name);
    let revisions_by_element = current.revisions_by_element();
    let orderings: Vec<&Ordering> = current.orderings().collect();
    let changes: HashMap<&str, &ElementChange> = summary
        .changes
        .iter()
        .map(|change| (change.element_id.as_str(), change))
        .collect();

    let mut groups: BTreeMap<String, Group> = BTreeMap::new();
    for element_id in current.assigned_element_ids() {
        let Some(revisions) = revisions_by_element.get(element_id) else {
            continue;
        };
        let order = chronological_order(revisions, orderings.iter().copied());
        report.cycles_broken += order.cycles_broken;

        let previous_record = previous_records.get(element_id);
        let mut properties = BTreeMap::new();
        let mut labels = Vec::with_capacity(order.revisions.len());
        for revision in &order.revisions {
            let label = revision.label.as_str();
            if label == HISTORY_KEY || label == LATEST_KEY {
                tracing::warn!(
                    stage = STAGE_ANNOTATE,
                    element_id = %element_id,
                    global_id = %revision.global_id,
                    label = %label,
                    "revision label collides with a history key; left out of the record"
                );
                report.reserved_labels_skipped += 1;
                continue;
            }

            let fresh = (new_revision_id == Some(revision.global_id.as_str()))
                .then(|| changes.get(element_id).map(|change| change.describe()))
                .flatten();
            let description = fresh.or_else(|| {
                previous_record
                    .and_then(|record| record.get(label))
                    .map(str::to_string)
            });
            let description = match description {
                Some(text) => text,
                None => {
                    tracing::warn!(
                        stage = STAGE_ANNOTATE,
                        element_id = %element_id,
                        label = %label,
                        "no description for revision; writing fallback"
                    );
                    report.fallbacks.push(FallbackEntry {
                        element_id: element_id.to_string(),
                        label: label.to_string(),
                    });
                    GENERIC_FALLBACK.to_string()
                }
            };
            properties.insert(label.to_string(), description);
            labels.push(label);
        }
        let Some(latest) = labels.last() else {
            continue;
        };
        properties.insert(LATEST_KEY.to_string(), latest.to_string());
        properties.insert(HISTORY_KEY.to_string(), labels.join(", "));

        let signature = history_signature(&properties)?;
        groups
            .entry(signature)
            .or_insert_with(|| Group {
                properties,
                element_ids: Vec::new(),
            })
            .element_ids
            .push(element_id.to_string());
    }

    for (signature, group) in groups {
        let id = record_id(record_name, &signature);
        let count = group.element_ids.len();
        let record = MetadataRecord {
            global_id: id.clone(),
            name: record_name.to_string(),
            properties: group.properties,
        };
        let result = current.insert_metadata_record(record).and_then(|()| {
            current.insert_metadata_attachment(MetadataAttachment::new(
                attachment_id(&id),
                id.clone(),
                group.element_ids,
            ))
        });
        match result {
            Ok(()) => {
                report.records_created += 1;
                report.elements_annotated += count;
            }
            Err(e) => {
                tracing::warn!(
                    stage = STAGE_ANNOTATE,
                    global_id = %id,
                    elements = count,
                    error = %e,
                    "failed to attach history record"
                );
                report.elements_failed += count;
            }
        }
    }

    tracing::info!(
        stage = STAGE_ANNOTATE,
        elements_annotated = report.elements_annotated,
        records_created = report.records_created,
        records_removed = report.records_removed,
        fallbacks = report.fallbacks.len(),
        cycles_broken = report.cycles_broken,
        "history records rebuilt"
    );
    Ok(report)
}
