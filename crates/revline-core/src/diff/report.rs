//! Diff report types and defensive parsing.
//!
//! The report is produced by an external differ and its per-element payload
//! varies in shape between versions. Parsing is strict about the top-level
//! structure and lenient about everything inside a changed entry: a missing,
//! null or mistyped field means "no change".

use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::errors::{Result, RevlineError};

/// Which elements were added, changed or deleted between two snapshots
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiffReport {
    pub added: Vec<String>,
    pub changed: BTreeMap<String, ChangeMetadata>,
    pub deleted: Vec<String>,
}

/// Per-element change flags and property-level paths
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChangeMetadata {
    pub geometry_changed: bool,
    pub materials_changed: bool,
    pub container_changed: bool,
    pub aggregate_changed: bool,
    pub properties: PropertyChanges,
}

impl ChangeMetadata {
    /// Geometry-only change, the most common shape in practice
    pub fn geometry() -> Self {
        Self {
            geometry_changed: true,
            ..Self::default()
        }
    }
}

/// Property paths, normalised to `<group>.<key>` form
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyChanges {
    pub added: Vec<String>,
    pub removed: Vec<String>,
    pub changed: Vec<String>,
}

impl PropertyChanges {
    /// Every path, added then removed then changed
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.added
            .iter()
            .chain(self.removed.iter())
            .chain(self.changed.iter())
            .map(String::as_str)
    }
}

/// Normalise a property path to dotted `<group>.<key>` form
///
/// DeepDiff-style paths (`root['Pset_WallCommon']['FireRating']`) are
/// flattened; anything else is returned trimmed.
pub fn normalize_path(raw: &str) -> String {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("root") else {
        return trimmed.to_string();
    };
    if !rest.starts_with('[') {
        return trimmed.to_string();
    }

    let mut segments = Vec::new();
    let mut remaining = rest;
    while let Some(start) = remaining.find('[') {
        let after = &remaining[start + 1..];
        let Some(end) = after.find(']') else {
            break;
        };
        segments.push(after[..end].trim_matches(|c| c == '\'' || c == '"'));
        remaining = &after[end + 1..];
    }
    segments.join(".")
}

/// Parse raw diff report bytes
///
/// # Errors
///
/// Returns `InvalidDiffReport` if the bytes are not UTF-8 JSON, the root is
/// not an object, or `added`/`deleted`/`changed` have the wrong container type.
pub fn parse_diff_report(bytes: &[u8]) -> Result<DiffReport> {
    let text = std::str::from_utf8(bytes).map_err(|e| RevlineError::InvalidDiffReport {
        reason: format!("diff report is not valid UTF-8: {}", e),
    })?;
    let raw: Value = serde_json::from_str(text).map_err(|e| RevlineError::InvalidDiffReport {
        reason: format!("diff report is not valid JSON: {}", e),
    })?;
    diff_report_from_value(&raw)
}

/// Interpret an already-parsed JSON value as a diff report
///
/// # Errors
///
/// Same structural rules as [`parse_diff_report`].
pub fn diff_report_from_value(raw: &Value) -> Result<DiffReport> {
    let obj = raw
        .as_object()
        .ok_or_else(|| RevlineError::InvalidDiffReport {
            reason: "diff report root must be an object".to_string(),
        })?;

    let added = id_list(obj, "added")?;
    let deleted = id_list(obj, "deleted")?;

    let mut changed = BTreeMap::new();
    match obj.get("changed") {
        None | Some(Value::Null) => {}
        Some(Value::Object(entries)) => {
            for (element_id, entry) in entries {
                changed.insert(element_id.clone(), change_metadata(element_id, entry));
            }
        }
        Some(other) => {
            return Err(RevlineError::InvalidDiffReport {
                reason: format!("`changed` must be an object, got {}", type_name(other)),
            })
        }
    }

    Ok(DiffReport {
        added,
        changed,
        deleted,
    })
}

fn id_list(obj: &Map<String, Value>, key: &str) -> Result<Vec<String>> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => Ok(items
            .iter()
            .filter_map(|item| match item.as_str() {
                Some(id) => Some(id.to_string()),
                None => {
                    tracing::warn!(
                        stage = revline_core_types::schema::STAGE_INTERPRET,
                        key,
                        entry = %item,
                        "skipping non-string identifier in diff report"
                    );
                    None
                }
            })
            .collect()),
        Some(other) => Err(RevlineError::InvalidDiffReport {
            reason: format!("`{}` must be an array, got {}", key, type_name(other)),
        }),
    }
}

fn change_metadata(element_id: &str, entry: &Value) -> ChangeMetadata {
    let Some(fields) = entry.as_object() else {
        tracing::debug!(
            stage = revline_core_types::schema::STAGE_INTERPRET,
            element_id,
            "changed entry is not an object; treating as no change"
        );
        return ChangeMetadata::default();
    };

    let flag = |name: &str| fields.get(name).and_then(Value::as_bool).unwrap_or(false);

    ChangeMetadata {
        geometry_changed: flag("geometry_changed"),
        materials_changed: flag("materials_changed"),
        container_changed: flag("container_changed"),
        aggregate_changed: flag("aggregate_changed"),
        properties: fields
            .get("properties_changed")
            .and_then(Value::as_object)
            .map(property_changes)
            .unwrap_or_default(),
    }
}

fn property_changes(groups: &Map<String, Value>) -> PropertyChanges {
    let mut changes = PropertyChanges::default();
    for (kind, value) in groups {
        let paths: Vec<String> = match value {
            Value::Array(items) => items
                .iter()
                .filter_map(Value::as_str)
                .map(normalize_path)
                .collect(),
            Value::Object(entries) => entries.keys().map(|k| normalize_path(k)).collect(),
            _ => Vec::new(),
        };
        match kind.as_str() {
            "dictionary_item_added" => changes.added.extend(paths),
            "dictionary_item_removed" => changes.removed.extend(paths),
            _ => changes.changed.extend(paths),
        }
    }
    changes
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
