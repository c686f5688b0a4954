#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{linked_labels, regenerated, two_revision_history, RECORD_NAME};
use revline_core::diff::parse_diff_report;
use revline_core::{merge_history, MergeConfig};

const MIXED_REPORT: &[u8] = br#"{
    "added": [],
    "changed": {
        "X": {
            "geometry_changed": false,
            "properties_changed": {
                "values_changed": {
                    "root['Pset_WallCommon']['FireRating']": {
                        "old_value": "EI30",
                        "new_value": "EI60"
                    },
                    "root['Attributes']['Tag']": {"old_value": "1", "new_value": "2"}
                }
            }
        },
        "Y": {
            "geometry_changed": false,
            "properties_changed": {
                "values_changed": {
                    "root['Attributes']['GlobalId']": {},
                    "root['RevisionHistory']['PM2']": {}
                }
            }
        }
    },
    "deleted": ["Gone"]
}"#;

#[test]
fn test_noise_only_element_is_not_assigned() {
    let previous = two_revision_history();
    let mut current = regenerated(&previous);
    let report = parse_diff_report(MIXED_REPORT).unwrap();

    let outcome = merge_history(&previous, &mut current, &report, &MergeConfig::default()).unwrap();

    assert_eq!(outcome.summary.changed, 1);
    assert_eq!(outcome.summary.skipped, 1);
    assert_eq!(outcome.summary.deleted, 1);
    assert_eq!(outcome.summary.total(), 1);

    assert_eq!(linked_labels(&current, "X"), vec!["PM1", "PM2", "PM3"]);
    assert_eq!(linked_labels(&current, "Y"), vec!["PM2"]);

    let pm3 = current.revision_by_label("PM3").unwrap();
    assert_eq!(
        pm3.description.as_deref(),
        Some("1 elements updated (0 added, 1 modified)")
    );

    let x = current.metadata_for_element("X", RECORD_NAME).unwrap();
    assert_eq!(
        x.get("PM3"),
        Some("Modified: properties (Pset_WallCommon.FireRating)")
    );
}

#[test]
fn test_empty_ignore_list_disables_filtering() {
    let previous = two_revision_history();
    let mut current = regenerated(&previous);
    let report = parse_diff_report(MIXED_REPORT).unwrap();
    let config = MergeConfig::from_toml_str("ignored_properties = []").unwrap();

    let outcome = merge_history(&previous, &mut current, &report, &config).unwrap();
    assert_eq!(outcome.summary.changed, 2);
    assert_eq!(outcome.summary.skipped, 0);
    assert_eq!(linked_labels(&current, "Y"), vec!["PM2", "PM3"]);
}

#[test]
fn test_custom_patterns_replace_defaults() {
    let previous = two_revision_history();
    let mut current = regenerated(&previous);
    let report = parse_diff_report(MIXED_REPORT).unwrap();
    let config = MergeConfig::from_toml_str(
        "ignored_properties = [\"Pset_WallCommon.*\", \"*.Tag\"]",
    )
    .unwrap();

    let outcome = merge_history(&previous, &mut current, &report, &config).unwrap();
    // X is now pure noise; Y's GlobalId is no longer ignored
    assert_eq!(outcome.summary.skipped, 1);
    assert_eq!(linked_labels(&current, "X"), vec!["PM1", "PM2"]);
    assert_eq!(linked_labels(&current, "Y"), vec!["PM2", "PM3"]);
}

#[test]
fn test_renamed_history_record_group_is_still_noise() {
    let previous = two_revision_history();
    let mut current = regenerated(&previous);
    let report = parse_diff_report(
        br#"{
            "changed": {
                "X": {
                    "properties_changed": {
                        "values_changed": {"root['Pset_WallCommon']['FireRating']": {}}
                    }
                },
                "Y": {
                    "properties_changed": {
                        "values_changed": {
                            "root['ModelHistory']['PM2']": {},
                            "root['ModelHistory']['LatestRevision']": {}
                        }
                    }
                }
            }
        }"#,
    )
    .unwrap();
    let config = MergeConfig::from_toml_str("history_record_name = \"ModelHistory\"").unwrap();

    let outcome = merge_history(&previous, &mut current, &report, &config).unwrap();

    assert_eq!(outcome.summary.changed, 1);
    assert_eq!(outcome.summary.skipped, 1);
    assert_eq!(
        outcome.summary.element_ids().collect::<Vec<_>>(),
        vec!["X"]
    );
}
