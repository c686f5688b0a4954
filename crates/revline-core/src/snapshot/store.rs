use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::errors::{Result, RevlineError};
use crate::model::{Assignment, Element, MetadataAttachment, MetadataRecord, Ordering, Revision};

/// Which kind of entity owns a persistent identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Element,
    Revision,
    Assignment,
    Ordering,
    MetadataRecord,
    MetadataAttachment,
}

/// In-memory model graph of one snapshot
///
/// Every entity kind lives in an ordered map keyed by its persistent
/// identifier; together the maps form the identifier index. Iteration order is
/// identifier order, so every traversal the engine performs is deterministic.
///
/// Identifiers are unique across kinds. Relations may only be inserted when all
/// of their endpoints already exist.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub(crate) elements: BTreeMap<String, Element>,
    pub(crate) revisions: BTreeMap<String, Revision>,
    pub(crate) assignments: BTreeMap<String, Assignment>,
    pub(crate) orderings: BTreeMap<String, Ordering>,
    pub(crate) metadata_records: BTreeMap<String, MetadataRecord>,
    pub(crate) metadata_attachments: BTreeMap<String, MetadataAttachment>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up which entity kind owns `global_id`, if any
    pub fn entity_kind(&self, global_id: &str) -> Option<EntityKind> {
        if self.elements.contains_key(global_id) {
            Some(EntityKind::Element)
        } else if self.revisions.contains_key(global_id) {
            Some(EntityKind::Revision)
        } else if self.assignments.contains_key(global_id) {
            Some(EntityKind::Assignment)
        } else if self.orderings.contains_key(global_id) {
            Some(EntityKind::Ordering)
        } else if self.metadata_records.contains_key(global_id) {
            Some(EntityKind::MetadataRecord)
        } else if self.metadata_attachments.contains_key(global_id) {
            Some(EntityKind::MetadataAttachment)
        } else {
            None
        }
    }

    fn ensure_unused(&self, global_id: &str) -> Result<()> {
        match self.entity_kind(global_id) {
            Some(existing) => Err(RevlineError::AlreadyExists {
                global_id: global_id.to_string(),
                existing,
            }),
            None => Ok(()),
        }
    }

    fn ensure_element(&self, element_id: &str) -> Result<()> {
        match self.entity_kind(element_id) {
            Some(EntityKind::Element) => Ok(()),
            Some(actual) => Err(RevlineError::KindConflict {
                global_id: element_id.to_string(),
                expected: EntityKind::Element,
                actual,
            }),
            None => Err(RevlineError::ElementNotFound {
                element_id: element_id.to_string(),
            }),
        }
    }

    fn ensure_revision(&self, revision_id: &str) -> Result<()> {
        match self.entity_kind(revision_id) {
            Some(EntityKind::Revision) => Ok(()),
            Some(actual) => Err(RevlineError::KindConflict {
                global_id: revision_id.to_string(),
                expected: EntityKind::Revision,
                actual,
            }),
            None => Err(RevlineError::RevisionNotFound {
                revision_id: revision_id.to_string(),
            }),
        }
    }

    // ---------- Elements ----------

    /// Insert an Element
    ///
    /// # Errors
    ///
    /// Returns `AlreadyExists` if the identifier is taken.
    pub fn insert_element(&mut self, element: Element) -> Result<()> {
        self.ensure_unused(&element.global_id)?;
        self.elements.insert(element.global_id.clone(), element);
        Ok(())
    }

    pub fn element(&self, global_id: &str) -> Option<&Element> {
        self.elements.get(global_id)
    }

    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.elements.values()
    }

    // ---------- Revisions ----------

    /// Insert a Revision
    ///
    /// # Errors
    ///
    /// Returns `AlreadyExists` if the identifier is taken.
    pub fn insert_revision(&mut self, revision: Revision) -> Result<()> {
        self.ensure_unused(&revision.global_id)?;
        self.revisions.insert(revision.global_id.clone(), revision);
        Ok(())
    }

    pub fn revision(&self, global_id: &str) -> Option<&Revision> {
        self.revisions.get(global_id)
    }

    pub fn revisions(&self) -> impl Iterator<Item = &Revision> {
        self.revisions.values()
    }

    /// First revision (in identifier order) carrying `label`
    pub fn revision_by_label(&self, label: &str) -> Option<&Revision> {
        self.revisions.values().find(|r| r.label == label)
    }

    // ---------- Assignments ----------

    /// Insert an Assignment relation
    ///
    /// # Errors
    ///
    /// Returns `AlreadyExists` if the identifier is taken, `RevisionNotFound` /
    /// `ElementNotFound` for dangling endpoints, `KindConflict` if an endpoint
    /// identifier belongs to another kind of entity.
    pub fn insert_assignment(&mut self, assignment: Assignment) -> Result<()> {
        self.ensure_unused(&assignment.global_id)?;
        self.ensure_revision(&assignment.revision_id)?;
        for element_id in &assignment.element_ids {
            self.ensure_element(element_id)?;
        }
        self.assignments
            .insert(assignment.global_id.clone(), assignment);
        Ok(())
    }

    /// Add elements to an existing Assignment, skipping ones already linked
    ///
    /// Returns the number of newly linked elements.
    ///
    /// # Errors
    ///
    /// Returns `AssignmentNotFound` if no such assignment exists, or
    /// `ElementNotFound` / `KindConflict` for a bad element identifier (in which
    /// case the assignment is left unchanged).
    pub fn extend_assignment(
        &mut self,
        assignment_id: &str,
        element_ids: &[String],
    ) -> Result<usize> {
        if !self.assignments.contains_key(assignment_id) {
            return Err(RevlineError::AssignmentNotFound {
                assignment_id: assignment_id.to_string(),
            });
        }
        for element_id in element_ids {
            self.ensure_element(element_id)?;
        }

        let assignment = self.assignments.get_mut(assignment_id).ok_or_else(|| {
            RevlineError::AssignmentNotFound {
                assignment_id: assignment_id.to_string(),
            }
        })?;
        let mut linked: HashSet<String> = assignment.element_ids.iter().cloned().collect();
        let mut added = 0;
        for element_id in element_ids {
            if linked.insert(element_id.clone()) {
                assignment.element_ids.push(element_id.clone());
                added += 1;
            }
        }
        Ok(added)
    }

    pub fn assignment(&self, global_id: &str) -> Option<&Assignment> {
        self.assignments.get(global_id)
    }

    pub fn assignments(&self) -> impl Iterator<Item = &Assignment> {
        self.assignments.values()
    }

    /// Revisions assigned to an element, deduplicated, in discovery order
    pub fn revisions_for_element(&self, element_id: &str) -> Vec<&Revision> {
        let mut seen = BTreeSet::new();
        self.assignments
            .values()
            .filter(|a| a.links(element_id))
            .filter_map(|a| self.revisions.get(&a.revision_id))
            .filter(|r| seen.insert(r.global_id.as_str()))
            .collect()
    }

    /// [`Snapshot::revisions_for_element`] for every assigned element at once
    ///
    /// One pass over the assignments; stages that visit every element use this
    /// instead of per-element lookups.
    pub fn revisions_by_element(&self) -> HashMap<&str, Vec<&Revision>> {
        let mut index: HashMap<&str, Vec<&Revision>> = HashMap::new();
        for assignment in self.assignments.values() {
            let Some(revision) = self.revisions.get(&assignment.revision_id) else {
                continue;
            };
            for element_id in &assignment.element_ids {
                let revisions = index.entry(element_id.as_str()).or_default();
                if !revisions.iter().any(|r| r.global_id == revision.global_id) {
                    revisions.push(revision);
                }
            }
        }
        index
    }

    /// Elements that have at least one Assignment
    pub fn assigned_element_ids(&self) -> BTreeSet<&str> {
        self.assignments
            .values()
            .flat_map(|a| a.element_ids.iter())
            .filter(|id| self.elements.contains_key(id.as_str()))
            .map(String::as_str)
            .collect()
    }

    // ---------- Orderings ----------

    /// Insert an Ordering relation
    ///
    /// # Errors
    ///
    /// Returns `AlreadyExists` if the identifier is taken, `RevisionNotFound` /
    /// `KindConflict` if either endpoint is not a revision.
    pub fn insert_ordering(&mut self, ordering: Ordering) -> Result<()> {
        self.ensure_unused(&ordering.global_id)?;
        self.ensure_revision(&ordering.predecessor_id)?;
        self.ensure_revision(&ordering.successor_id)?;
        self.orderings.insert(ordering.global_id.clone(), ordering);
        Ok(())
    }

    pub fn has_ordering(&self, predecessor_id: &str, successor_id: &str) -> bool {
        self.orderings
            .values()
            .any(|o| o.predecessor_id == predecessor_id && o.successor_id == successor_id)
    }

    pub fn orderings(&self) -> impl Iterator<Item = &Ordering> {
        self.orderings.values()
    }

    // ---------- Metadata ----------

    /// Insert a MetadataRecord
    ///
    /// # Errors
    ///
    /// Returns `AlreadyExists` if the identifier is taken.
    pub fn insert_metadata_record(&mut self, record: MetadataRecord) -> Result<()> {
        self.ensure_unused(&record.global_id)?;
        self.metadata_records
            .insert(record.global_id.clone(), record);
        Ok(())
    }

    /// Insert a MetadataAttachment
    ///
    /// # Errors
    ///
    /// Returns `AlreadyExists` if the identifier is taken,
    /// `MetadataRecordNotFound` if the record is missing, `ElementNotFound` /
    /// `KindConflict` for a bad element identifier.
    pub fn insert_metadata_attachment(&mut self, attachment: MetadataAttachment) -> Result<()> {
        self.ensure_unused(&attachment.global_id)?;
        if !self.metadata_records.contains_key(&attachment.record_id) {
            return Err(RevlineError::MetadataRecordNotFound {
                record_id: attachment.record_id.clone(),
            });
        }
        for element_id in &attachment.element_ids {
            self.ensure_element(element_id)?;
        }
        self.metadata_attachments
            .insert(attachment.global_id.clone(), attachment);
        Ok(())
    }

    pub fn metadata_record(&self, global_id: &str) -> Option<&MetadataRecord> {
        self.metadata_records.get(global_id)
    }

    pub fn metadata_records(&self) -> impl Iterator<Item = &MetadataRecord> {
        self.metadata_records.values()
    }

    pub fn metadata_attachments(&self) -> impl Iterator<Item = &MetadataAttachment> {
        self.metadata_attachments.values()
    }

    /// The record named `record_name` attached to an element, if any
    pub fn metadata_for_element(
        &self,
        element_id: &str,
        record_name: &str,
    ) -> Option<&MetadataRecord> {
        self.metadata_attachments
            .values()
            .filter(|a| a.element_ids.iter().any(|id| id == element_id))
            .filter_map(|a| self.metadata_records.get(&a.record_id))
            .find(|r| r.name == record_name)
    }

    /// [`Snapshot::metadata_for_element`] for every attached element at once
    pub fn metadata_by_element(&self, record_name: &str) -> HashMap<&str, &MetadataRecord> {
        let mut index = HashMap::new();
        for attachment in self.metadata_attachments.values() {
            let Some(record) = self.metadata_records.get(&attachment.record_id) else {
                continue;
            };
            if record.name != record_name {
                continue;
            }
            for element_id in &attachment.element_ids {
                index.entry(element_id.as_str()).or_insert(record);
            }
        }
        index
    }

    /// Remove every record named `record_name` and the attachments pointing at
    /// them; returns how many records were removed
    pub fn remove_metadata_records_named(&mut self, record_name: &str) -> usize {
        let removed: HashSet<String> = self
            .metadata_records
            .values()
            .filter(|r| r.name == record_name)
            .map(|r| r.global_id.clone())
            .collect();
        self.metadata_records
            .retain(|id, _| !removed.contains(id));
        self.metadata_attachments
            .retain(|_, attachment| !removed.contains(&attachment.record_id));
        removed.len()
    }
}
