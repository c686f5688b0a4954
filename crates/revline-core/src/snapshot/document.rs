//! Serialized snapshot document.
//!
//! The document is the interchange form of a [`Snapshot`]: flat entity lists
//! instead of identifier-keyed maps. Converting a document into a snapshot
//! re-runs every identifier and endpoint check, so a structurally broken file
//! is rejected as a whole.

use serde::{Deserialize, Serialize};

use crate::errors::{Result, RevlineError};
use crate::model::{Assignment, Element, MetadataAttachment, MetadataRecord, Ordering, Revision};
use crate::snapshot::Snapshot;

/// Current snapshot document schema version
pub const SNAPSHOT_SCHEMA_VERSION: u32 = 1;

fn default_schema_version() -> u32 {
    SNAPSHOT_SCHEMA_VERSION
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SnapshotDocument {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    #[serde(default)]
    pub elements: Vec<Element>,
    #[serde(default)]
    pub revisions: Vec<Revision>,
    #[serde(default)]
    pub assignments: Vec<Assignment>,
    #[serde(default)]
    pub orderings: Vec<Ordering>,
    #[serde(default)]
    pub metadata_records: Vec<MetadataRecord>,
    #[serde(default)]
    pub metadata_attachments: Vec<MetadataAttachment>,
}

fn invalid(err: RevlineError) -> RevlineError {
    RevlineError::InvalidSnapshot {
        reason: err.to_string(),
    }
}

impl TryFrom<SnapshotDocument> for Snapshot {
    type Error = RevlineError;

    fn try_from(doc: SnapshotDocument) -> Result<Self> {
        if doc.schema_version > SNAPSHOT_SCHEMA_VERSION {
            return Err(RevlineError::InvalidSnapshot {
                reason: format!(
                    "unsupported schema_version {} (max {})",
                    doc.schema_version, SNAPSHOT_SCHEMA_VERSION
                ),
            });
        }

        let mut snapshot = Snapshot::new();
        // Nodes first, then the relations that reference them
        for element in doc.elements {
            snapshot.insert_element(element).map_err(invalid)?;
        }
        for revision in doc.revisions {
            snapshot.insert_revision(revision).map_err(invalid)?;
        }
        for record in doc.metadata_records {
            snapshot.insert_metadata_record(record).map_err(invalid)?;
        }
        for assignment in doc.assignments {
            snapshot.insert_assignment(assignment).map_err(invalid)?;
        }
        for ordering in doc.orderings {
            snapshot.insert_ordering(ordering).map_err(invalid)?;
        }
        for attachment in doc.metadata_attachments {
            snapshot
                .insert_metadata_attachment(attachment)
                .map_err(invalid)?;
        }
        Ok(snapshot)
    }
}

impl From<&Snapshot> for SnapshotDocument {
    fn from(snapshot: &Snapshot) -> Self {
        Self {
            schema_version: SNAPSHOT_SCHEMA_VERSION,
            elements: snapshot.elements().cloned().collect(),
            revisions: snapshot.revisions().cloned().collect(),
            assignments: snapshot.assignments().cloned().collect(),
            orderings: snapshot.orderings().cloned().collect(),
            metadata_records: snapshot.metadata_records().cloned().collect(),
            metadata_attachments: snapshot.metadata_attachments().cloned().collect(),
        }
    }
}

/// Parse snapshot document bytes into a [`Snapshot`]
///
/// # Errors
///
/// Returns `InvalidSnapshot` if the bytes are not UTF-8 JSON of the document
/// shape, or if the contained entities violate identifier/endpoint rules.
pub fn parse_snapshot(bytes: &[u8]) -> Result<Snapshot> {
    let text = std::str::from_utf8(bytes).map_err(|e| RevlineError::InvalidSnapshot {
        reason: format!("snapshot is not valid UTF-8: {}", e),
    })?;
    let doc: SnapshotDocument =
        serde_json::from_str(text).map_err(|e| RevlineError::InvalidSnapshot {
            reason: format!("snapshot is not a valid document: {}", e),
        })?;
    Snapshot::try_from(doc)
}

/// Render a [`Snapshot`] as pretty-printed document JSON
///
/// # Errors
///
/// Returns `Serialization` if JSON encoding fails.
pub fn render_snapshot(snapshot: &Snapshot) -> Result<Vec<u8>> {
    let doc = SnapshotDocument::from(snapshot);
    Ok(serde_json::to_vec_pretty(&doc)?)
}
