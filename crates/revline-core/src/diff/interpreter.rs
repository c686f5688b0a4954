//! Classification of diff-report entries into meaningful changes and noise.
//!
//! An element is meaningfully changed iff it was added, raised any of the four
//! change flags, or has at least one property path not matched by an ignore
//! pattern. Everything else is noise: no description, no assignment, only a
//! `skipped` count.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use revline_core_types::schema::STAGE_INTERPRET;

use crate::diff::ignore::IgnorePatterns;
use crate::diff::report::{ChangeMetadata, DiffReport};

/// How many property paths a description lists before summarising the rest
const MAX_LISTED_PATHS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeKind {
    Added,
    Changed,
}

/// Category tag of a meaningful change
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ChangeCategory {
    Geometry,
    Materials,
    Container,
    Aggregate,
    Properties,
}

impl ChangeCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeCategory::Geometry => "geometry",
            ChangeCategory::Materials => "materials",
            ChangeCategory::Container => "container",
            ChangeCategory::Aggregate => "aggregate",
            ChangeCategory::Properties => "properties",
        }
    }
}

/// One element that qualifies for the current run's revision
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementChange {
    pub element_id: String,
    pub kind: ChangeKind,
    pub categories: Vec<ChangeCategory>,
    /// Property paths that survived ignore filtering
    pub property_paths: Vec<String>,
}

impl ElementChange {
    /// Human description of what changed for this element in this run
    pub fn describe(&self) -> String {
        match self.kind {
            ChangeKind::Added => "Added".to_string(),
            ChangeKind::Changed => {
                let parts: Vec<String> = self
                    .categories
                    .iter()
                    .map(|category| match category {
                        ChangeCategory::Properties => {
                            format!("properties ({})", self.listed_paths())
                        }
                        other => other.as_str().to_string(),
                    })
                    .collect();
                format!("Modified: {}", parts.join(", "))
            }
        }
    }

    fn listed_paths(&self) -> String {
        let mut listed: Vec<String> = self
            .property_paths
            .iter()
            .take(MAX_LISTED_PATHS)
            .cloned()
            .collect();
        let rest = self.property_paths.len().saturating_sub(MAX_LISTED_PATHS);
        if rest > 0 {
            listed.push(format!("+{} more", rest));
        }
        listed.join(", ")
    }
}

/// Output of the interpreter: qualifying elements plus counts
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeSummary {
    pub changes: Vec<ElementChange>,
    pub added: usize,
    pub changed: usize,
    /// Changed entries whose every path matched an ignore pattern
    pub skipped: usize,
    /// Deleted entries (informational; never assigned)
    pub deleted: usize,
}

impl ChangeSummary {
    /// Number of qualifying elements
    pub fn total(&self) -> usize {
        self.added + self.changed
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn element_ids(&self) -> impl Iterator<Item = &str> {
        self.changes.iter().map(|c| c.element_id.as_str())
    }

    pub fn change_for(&self, element_id: &str) -> Option<&ElementChange> {
        self.changes.iter().find(|c| c.element_id == element_id)
    }
}

/// Classify a diff report into meaningful changes
///
/// Pure function of its inputs. Added elements come first in report order,
/// then changed elements in identifier order. An element listed as both added
/// and changed counts once, as added.
pub fn interpret(report: &DiffReport, patterns: &IgnorePatterns) -> ChangeSummary {
    let mut summary = ChangeSummary {
        deleted: report.deleted.len(),
        ..ChangeSummary::default()
    };
    let mut seen = BTreeSet::new();

    for element_id in &report.added {
        if !seen.insert(element_id.as_str()) {
            continue;
        }
        summary.changes.push(ElementChange {
            element_id: element_id.clone(),
            kind: ChangeKind::Added,
            categories: Vec::new(),
            property_paths: Vec::new(),
        });
        summary.added += 1;
    }

    for (element_id, meta) in &report.changed {
        if !seen.insert(element_id.as_str()) {
            continue;
        }
        match classify(element_id, meta, patterns) {
            Some(change) => {
                summary.changes.push(change);
                summary.changed += 1;
            }
            None => {
                tracing::debug!(
                    stage = STAGE_INTERPRET,
                    element_id = %element_id,
                    "only ignored properties changed; skipping"
                );
                summary.skipped += 1;
            }
        }
    }

    tracing::debug!(
        stage = STAGE_INTERPRET,
        added = summary.added,
        changed = summary.changed,
        skipped = summary.skipped,
        deleted = summary.deleted,
        "diff report interpreted"
    );
    summary
}

fn classify(
    element_id: &str,
    meta: &ChangeMetadata,
    patterns: &IgnorePatterns,
) -> Option<ElementChange> {
    let mut categories = Vec::new();
    if meta.geometry_changed {
        categories.push(ChangeCategory::Geometry);
    }
    if meta.materials_changed {
        categories.push(ChangeCategory::Materials);
    }
    if meta.container_changed {
        categories.push(ChangeCategory::Container);
    }
    if meta.aggregate_changed {
        categories.push(ChangeCategory::Aggregate);
    }

    let mut property_paths: Vec<String> = meta
        .properties
        .paths()
        .filter(|path| !patterns.is_ignored(path))
        .map(str::to_string)
        .collect();
    property_paths.sort();
    property_paths.dedup();
    if !property_paths.is_empty() {
        categories.push(ChangeCategory::Properties);
    }

    if categories.is_empty() {
        return None;
    }
    Some(ElementChange {
        element_id: element_id.to_string(),
        kind: ChangeKind::Changed,
        categories,
        property_paths,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::report::PropertyChanges;

    fn props(changed: &[&str]) -> ChangeMetadata {
        ChangeMetadata {
            properties: PropertyChanges {
                changed: changed.iter().map(|s| s.to_string()).collect(),
                ..PropertyChanges::default()
            },
            ..ChangeMetadata::default()
        }
    }

    #[test]
    fn test_describe_added() {
        let change = ElementChange {
            element_id: "x".to_string(),
            kind: ChangeKind::Added,
            categories: Vec::new(),
            property_paths: Vec::new(),
        };
        assert_eq!(change.describe(), "Added");
    }

    #[test]
    fn test_describe_lists_categories_and_paths() {
        let mut report = DiffReport::default();
        let mut meta = props(&["Pset_WallCommon.FireRating"]);
        meta.geometry_changed = true;
        report.changed.insert("w".to_string(), meta);

        let summary = interpret(&report, &IgnorePatterns::none());
        assert_eq!(
            summary.change_for("w").unwrap().describe(),
            "Modified: geometry, properties (Pset_WallCommon.FireRating)"
        );
    }

    #[test]
    fn test_describe_truncates_long_path_lists() {
        let paths: Vec<String> = (0..7).map(|i| format!("Pset.P{}", i)).collect();
        let refs: Vec<&str> = paths.iter().map(String::as_str).collect();
        let mut report = DiffReport::default();
        report.changed.insert("w".to_string(), props(&refs));

        let description = interpret(&report, &IgnorePatterns::none())
            .change_for("w")
            .unwrap()
            .describe();
        assert!(description.ends_with("Pset.P4, +2 more)"), "{}", description);
    }

    #[test]
    fn test_noise_only_change_is_skipped() {
        let mut report = DiffReport::default();
        report
            .changed
            .insert("w".to_string(), props(&["Attributes.GlobalId"]));

        let summary = interpret(&report, &IgnorePatterns::new(&["*.GlobalId"]));
        assert!(summary.is_empty());
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.total(), 0);
    }

    #[test]
    fn test_flags_qualify_even_when_paths_are_noise() {
        let mut report = DiffReport::default();
        let mut meta = props(&["Attributes.GlobalId"]);
        meta.aggregate_changed = true;
        report.changed.insert("w".to_string(), meta);

        let summary = interpret(&report, &IgnorePatterns::new(&["*.GlobalId"]));
        let change = summary.change_for("w").unwrap();
        assert_eq!(change.categories, vec![ChangeCategory::Aggregate]);
        assert!(change.property_paths.is_empty());
    }

    #[test]
    fn test_added_and_changed_counted_once() {
        let mut report = DiffReport {
            added: vec!["n".to_string(), "n".to_string()],
            deleted: vec!["gone".to_string()],
            ..DiffReport::default()
        };
        report
            .changed
            .insert("n".to_string(), ChangeMetadata::geometry());

        let summary = interpret(&report, &IgnorePatterns::none());
        assert_eq!(summary.added, 1);
        assert_eq!(summary.changed, 0);
        assert_eq!(summary.deleted, 1);
        assert_eq!(summary.changes.len(), 1);
    }

    #[test]
    fn test_empty_changed_entry_is_noise() {
        let mut report = DiffReport::default();
        report
            .changed
            .insert("w".to_string(), ChangeMetadata::default());
        let summary = interpret(&report, &IgnorePatterns::none());
        assert_eq!(summary.skipped, 1);
    }
}
