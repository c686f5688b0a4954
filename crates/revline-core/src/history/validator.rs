//! Validation of historical (revision, element) links.
//!
//! A link carried over from the previous snapshot is only kept when that
//! snapshot's history record for the element holds a specific description for
//! the revision label. A link without one is previous bookkeeping gone wrong;
//! dropping it here lets the error heal over successive runs instead of
//! propagating.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::model::MetadataRecord;
use crate::snapshot::Snapshot;

/// Placeholder written when no description could be found for a label
///
/// Reserved: a stored value equal to this string never counts as evidence.
pub const GENERIC_FALLBACK: &str = "changed";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RejectReason {
    /// The element has no history record in the previous snapshot
    NoMetadataRecord,
    /// The history record has no entry for the label
    LabelMissing,
    /// The entry holds only the generic fallback placeholder
    GenericFallback,
}

impl RejectReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectReason::NoMetadataRecord => "no_metadata_record",
            RejectReason::LabelMissing => "label_missing",
            RejectReason::GenericFallback => "generic_fallback",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Accepted,
    Rejected(RejectReason),
}

impl Verdict {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Verdict::Accepted)
    }
}

/// Decides whether a historical assignment is authentic enough to keep
///
/// Injected into the importer so callers can swap the evidence rule (e.g. to
/// adopt a history that predates metadata records).
pub trait AssignmentValidator {
    /// Check one (revision label, element) pair from the previous snapshot
    fn check(&self, label: &str, element_id: &str) -> Verdict;
}

/// Accepts a link only when the previous snapshot holds a specific
/// description for it
///
/// # Example
/// ```
/// use revline_core::history::validator::{
///     AssignmentValidator, MetadataEvidenceValidator, RejectReason, Verdict,
/// };
/// use revline_core::Snapshot;
///
/// let previous = Snapshot::new();
/// let validator = MetadataEvidenceValidator::new(&previous, "RevisionHistory");
/// assert_eq!(
///     validator.check("PM1", "wall-1"),
///     Verdict::Rejected(RejectReason::NoMetadataRecord)
/// );
/// ```
#[derive(Debug, Clone)]
pub struct MetadataEvidenceValidator<'a> {
    /// Element → its history record in the previous snapshot
    records: HashMap<&'a str, &'a MetadataRecord>,
}

impl<'a> MetadataEvidenceValidator<'a> {
    pub fn new(previous: &'a Snapshot, record_name: &str) -> Self {
        Self {
            records: previous.metadata_by_element(record_name),
        }
    }
}

impl AssignmentValidator for MetadataEvidenceValidator<'_> {
    fn check(&self, label: &str, element_id: &str) -> Verdict {
        let Some(record) = self.records.get(element_id) else {
            return Verdict::Rejected(RejectReason::NoMetadataRecord);
        };
        match record.get(label) {
            None => Verdict::Rejected(RejectReason::LabelMissing),
            Some(GENERIC_FALLBACK) => Verdict::Rejected(RejectReason::GenericFallback),
            Some(_) => Verdict::Accepted,
        }
    }
}

/// Trusts every historical link
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAllValidator;

impl AssignmentValidator for AcceptAllValidator {
    fn check(&self, _label: &str, _element_id: &str) -> Verdict {
        Verdict::Accepted
    }
}
