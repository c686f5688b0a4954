use revline_core::diff::{ChangeMetadata, DiffReport};
use revline_core::history::HISTORY_KEY;
use revline_core::model::{
    Assignment, Element, MetadataAttachment, MetadataRecord, Ordering, Revision,
};
use revline_core::Snapshot;

pub const RECORD_NAME: &str = "RevisionHistory";

/// Fluent builder for test snapshots
///
/// Relation identifiers are generated from a counter so fixtures stay
/// readable and deterministic.
#[allow(dead_code)]
#[derive(Default)]
pub struct SnapshotBuilder {
    snapshot: Snapshot,
    counter: usize,
}

#[allow(dead_code)]
impl SnapshotBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&mut self, prefix: &str) -> String {
        self.counter += 1;
        format!("{}-{}", prefix, self.counter)
    }

    pub fn elements(mut self, ids: &[&str]) -> Self {
        for id in ids {
            self.snapshot
                .insert_element(Element::new(*id, "IfcWall"))
                .unwrap();
        }
        self
    }

    pub fn revision(mut self, id: &str, label: &str) -> Self {
        self.snapshot
            .insert_revision(Revision::new(id, label))
            .unwrap();
        self
    }

    pub fn assign(mut self, revision_id: &str, element_ids: &[&str]) -> Self {
        let id = self.next_id("assign");
        self.snapshot
            .insert_assignment(Assignment::new(
                id,
                revision_id,
                element_ids.iter().map(|e| e.to_string()).collect(),
            ))
            .unwrap();
        self
    }

    pub fn order(mut self, predecessor_id: &str, successor_id: &str) -> Self {
        let id = self.next_id("order");
        self.snapshot
            .insert_ordering(Ordering::new(id, predecessor_id, successor_id))
            .unwrap();
        self
    }

    /// Attach a history record with the given entries to one element
    pub fn history(mut self, element_id: &str, entries: &[(&str, &str)]) -> Self {
        let record_id = self.next_id("record");
        let mut record = MetadataRecord::new(record_id.clone(), RECORD_NAME);
        for (key, value) in entries {
            record = record.with_property(*key, *value);
        }
        self.snapshot.insert_metadata_record(record).unwrap();
        let attachment_id = self.next_id("attach");
        self.snapshot
            .insert_metadata_attachment(MetadataAttachment::new(
                attachment_id,
                record_id,
                vec![element_id.to_string()],
            ))
            .unwrap();
        self
    }

    pub fn build(self) -> Snapshot {
        self.snapshot
    }
}

/// Previous snapshot with PM1 -> {X}, PM2 -> {X, Y} and ordering PM1 -> PM2
#[allow(dead_code)]
pub fn two_revision_history() -> Snapshot {
    SnapshotBuilder::new()
        .elements(&["X", "Y"])
        .revision("rev-pm1", "PM1")
        .revision("rev-pm2", "PM2")
        .order("rev-pm1", "rev-pm2")
        .assign("rev-pm1", &["X"])
        .assign("rev-pm2", &["X", "Y"])
        .history(
            "X",
            &[
                ("PM1", "Added"),
                ("PM2", "Modified: geometry"),
                ("History", "PM1, PM2"),
                ("LatestRevision", "PM2"),
            ],
        )
        .history(
            "Y",
            &[
                ("PM2", "Added"),
                ("History", "PM2"),
                ("LatestRevision", "PM2"),
            ],
        )
        .build()
}

/// A regenerated snapshot: same elements as `previous`, no history at all
#[allow(dead_code)]
pub fn regenerated(previous: &Snapshot) -> Snapshot {
    let mut current = Snapshot::new();
    for element in previous.elements() {
        current.insert_element(element.clone()).unwrap();
    }
    current
}

/// Diff report where every listed element has a geometry change
#[allow(dead_code)]
pub fn geometry_changed(ids: &[&str]) -> DiffReport {
    let mut report = DiffReport::default();
    for id in ids {
        report
            .changed
            .insert(id.to_string(), ChangeMetadata::geometry());
    }
    report
}

/// The element's rebuilt history list, if it has a record
#[allow(dead_code)]
pub fn history_list(snapshot: &Snapshot, element_id: &str) -> Option<String> {
    snapshot
        .metadata_for_element(element_id, RECORD_NAME)
        .and_then(|r| r.get(HISTORY_KEY))
        .map(str::to_string)
}

/// Labels of the revisions currently linked to an element, sorted
#[allow(dead_code)]
pub fn linked_labels(snapshot: &Snapshot, element_id: &str) -> Vec<String> {
    let mut labels: Vec<String> = snapshot
        .revisions_for_element(element_id)
        .iter()
        .map(|r| r.label.clone())
        .collect();
    labels.sort();
    labels
}
