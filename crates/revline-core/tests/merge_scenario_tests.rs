#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{
    geometry_changed, history_list, linked_labels, regenerated, two_revision_history,
    SnapshotBuilder, RECORD_NAME,
};
use revline_core::diff::DiffReport;
use revline_core::history::{COMPLETED_STATUS, LATEST_KEY};
use revline_core::{merge_history, MergeConfig};

#[test]
fn test_scenario_single_change_on_two_revision_history() {
    let previous = two_revision_history();
    let mut current = regenerated(&previous);

    let outcome = merge_history(
        &previous,
        &mut current,
        &geometry_changed(&["X"]),
        &MergeConfig::default(),
    )
    .unwrap();

    assert_eq!(outcome.revision_label(), Some("PM3"));
    assert_eq!(outcome.build.attached, 1);

    let pm3 = current.revision_by_label("PM3").unwrap();
    assert_eq!(pm3.status.as_deref(), Some(COMPLETED_STATUS));
    assert!(current.has_ordering("rev-pm2", &pm3.global_id));

    assert_eq!(linked_labels(&current, "X"), vec!["PM1", "PM2", "PM3"]);
    assert_eq!(linked_labels(&current, "Y"), vec!["PM2"]);

    assert_eq!(history_list(&current, "X").as_deref(), Some("PM1, PM2, PM3"));
    // Y was not touched: its history is exactly what it was before
    assert_eq!(history_list(&current, "Y"), history_list(&previous, "Y"));

    let x = current.metadata_for_element("X", RECORD_NAME).unwrap();
    assert_eq!(x.get("PM1"), Some("Added"));
    assert_eq!(x.get("PM2"), Some("Modified: geometry"));
    assert_eq!(x.get("PM3"), Some("Modified: geometry"));
    assert_eq!(x.get(LATEST_KEY), Some("PM3"));
}

#[test]
fn test_history_preserved_with_same_identifiers() {
    let previous = two_revision_history();
    let mut current = regenerated(&previous);

    merge_history(
        &previous,
        &mut current,
        &geometry_changed(&["Y"]),
        &MergeConfig::default(),
    )
    .unwrap();

    for revision in previous.revisions() {
        let carried = current.revision(&revision.global_id).unwrap();
        assert_eq!(carried.label, revision.label);
    }
}

#[test]
fn test_exactly_one_revision_for_many_changes() {
    let previous = two_revision_history();
    let mut current = regenerated(&previous);
    current
        .insert_element(revline_core::model::Element::new("Z", "IfcSlab"))
        .unwrap();

    let mut report = geometry_changed(&["X", "Y"]);
    report.added.push("Z".to_string());
    let outcome = merge_history(&previous, &mut current, &report, &MergeConfig::default()).unwrap();

    assert_eq!(current.revisions().count(), previous.revisions().count() + 1);
    assert_eq!(outcome.summary.total(), 3);
    assert_eq!(outcome.build.attached, 3);

    let pm3 = current.revision_by_label("PM3").unwrap();
    assert_eq!(
        pm3.description.as_deref(),
        Some("3 elements updated (1 added, 2 modified)")
    );
    assert_eq!(history_list(&current, "Z").as_deref(), Some("PM3"));
    let z = current.metadata_for_element("Z", RECORD_NAME).unwrap();
    assert_eq!(z.get("PM3"), Some("Added"));
}

#[test]
fn test_label_continues_after_gaps_and_foreign_labels() {
    let previous = SnapshotBuilder::new()
        .elements(&["X"])
        .revision("r1", "PM1")
        .revision("r7", "PM7")
        .revision("r-design", "Design freeze")
        .assign("r7", &["X"])
        .history("X", &[("PM7", "Added")])
        .build();
    let mut current = regenerated(&previous);

    let outcome = merge_history(
        &previous,
        &mut current,
        &geometry_changed(&["X"]),
        &MergeConfig::default(),
    )
    .unwrap();
    assert_eq!(outcome.revision_label(), Some("PM8"));
    assert!(current.has_ordering("r7", outcome.build.revision_id.as_deref().unwrap()));
}

#[test]
fn test_first_run_starts_history() {
    let previous = revline_core::Snapshot::new();
    let mut current = SnapshotBuilder::new().elements(&["A", "B"]).build();
    let report = DiffReport {
        added: vec!["A".to_string(), "B".to_string()],
        ..DiffReport::default()
    };

    let outcome = merge_history(&previous, &mut current, &report, &MergeConfig::default()).unwrap();
    assert_eq!(outcome.revision_label(), Some("PM1"));
    assert_eq!(current.orderings().count(), 0);
    assert_eq!(history_list(&current, "A").as_deref(), Some("PM1"));
    // identical histories: one shared record
    assert_eq!(current.metadata_records().count(), 1);
}

#[test]
fn test_successive_runs_build_a_chain() {
    let config = MergeConfig::default();
    let mut previous = two_revision_history();

    for (run, expected) in [(3, "PM1, PM2, PM3"), (4, "PM1, PM2, PM3, PM4")] {
        let mut current = regenerated(&previous);
        let outcome =
            merge_history(&previous, &mut current, &geometry_changed(&["X"]), &config).unwrap();
        assert_eq!(outcome.revision_label(), Some(format!("PM{}", run).as_str()));
        assert_eq!(history_list(&current, "X").as_deref(), Some(expected));
        assert_eq!(history_list(&current, "Y").as_deref(), Some("PM2"));
        assert!(outcome.annotation.fallbacks.is_empty());
        previous = current;
    }
}

#[test]
fn test_interleaved_runs_keep_each_element_chronological() {
    let config = MergeConfig::default();
    let mut previous = revline_core::Snapshot::new();
    let mut seed = SnapshotBuilder::new().elements(&["X", "Y"]).build();
    let added = DiffReport {
        added: vec!["X".to_string(), "Y".to_string()],
        ..DiffReport::default()
    };
    merge_history(&previous, &mut seed, &added, &config).unwrap();
    previous = seed;

    // PM2 touches X, PM3 touches Y, PM4 touches X again
    for touched in ["X", "Y", "X"] {
        let mut current = regenerated(&previous);
        merge_history(&previous, &mut current, &geometry_changed(&[touched]), &config).unwrap();
        previous = current;
    }

    assert_eq!(history_list(&previous, "X").as_deref(), Some("PM1, PM2, PM4"));
    assert_eq!(history_list(&previous, "Y").as_deref(), Some("PM1, PM3"));
    let x = previous.metadata_for_element("X", RECORD_NAME).unwrap();
    assert_eq!(x.get(LATEST_KEY), Some("PM4"));
    let y = previous.metadata_for_element("Y", RECORD_NAME).unwrap();
    assert_eq!(y.get(LATEST_KEY), Some("PM3"));
}

#[test]
fn test_custom_prefix_and_template() {
    let config = MergeConfig::from_toml_str(
        r#"
label_prefix = "REV"
description_template = "{label}: {total} changed"
revision_name = "Coordination"
"#,
    )
    .unwrap();
    let previous = revline_core::Snapshot::new();
    let mut current = SnapshotBuilder::new().elements(&["A"]).build();
    let report = DiffReport {
        added: vec!["A".to_string()],
        ..DiffReport::default()
    };

    merge_history(&previous, &mut current, &report, &config).unwrap();
    let rev = current.revision_by_label("REV1").unwrap();
    assert_eq!(rev.description.as_deref(), Some("REV1: 1 changed"));
    assert_eq!(rev.name.as_deref(), Some("Coordination"));
}
