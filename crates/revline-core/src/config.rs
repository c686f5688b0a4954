//! Merge configuration.
//!
//! Configuration is explicit: the engine never reads environment variables.
//! Callers build a [`MergeConfig`] in code or parse one from TOML.
//!
//! ```toml
//! label_prefix = "PM"
//! description_template = "{total} elements updated ({added} added, {changed} modified)"
//! revision_name = "Weekly coordination"
//! ignored_properties = ["*.GlobalId", "Pset_Audit.*"]
//! history_record_name = "RevisionHistory"
//! ```

use serde::{Deserialize, Serialize};

use crate::diff::IgnorePatterns;
use crate::errors::{Result, RevlineError};

pub const DEFAULT_LABEL_PREFIX: &str = "PM";
pub const DEFAULT_DESCRIPTION_TEMPLATE: &str =
    "{total} elements updated ({added} added, {changed} modified)";
pub const DEFAULT_HISTORY_RECORD_NAME: &str = "RevisionHistory";

/// Identifier-style fields and timestamp fields
///
/// The history record group is added by [`MergeConfig::ignore_patterns`].
pub const DEFAULT_IGNORED_PROPERTIES: &[&str] = &[
    "*.GlobalId",
    "*.id",
    "*.Tag",
    "*.OwnerHistory",
    "*.CreationDate",
    "*.LastModifiedDate",
    "*.Timestamp",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MergeConfig {
    /// Label namespace for revisions (`<prefix><integer>`)
    pub label_prefix: String,

    /// Template for the new revision's description
    ///
    /// Placeholders: `{label}`, `{total}`, `{added}`, `{changed}`,
    /// `{skipped}`, `{deleted}`.
    pub description_template: String,

    /// Optional human-readable name stored on the new revision
    pub revision_name: Option<String>,

    /// Glob patterns over `<group>.<key>` property paths treated as noise;
    /// an empty list disables filtering, history record group included
    pub ignored_properties: Vec<String>,

    /// Name of the metadata records owned by the engine
    pub history_record_name: String,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            label_prefix: DEFAULT_LABEL_PREFIX.to_string(),
            description_template: DEFAULT_DESCRIPTION_TEMPLATE.to_string(),
            revision_name: None,
            ignored_properties: DEFAULT_IGNORED_PROPERTIES
                .iter()
                .map(|p| p.to_string())
                .collect(),
            history_record_name: DEFAULT_HISTORY_RECORD_NAME.to_string(),
        }
    }
}

impl MergeConfig {
    /// Parse and validate a TOML configuration; missing keys take defaults
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` on TOML syntax errors, unknown keys, or a
    /// failed [`MergeConfig::validate`].
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: MergeConfig = toml::from_str(text).map_err(|e| RevlineError::InvalidConfig {
            reason: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check the configuration for values the engine cannot work with
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the label prefix is blank or ends in a digit
    /// (labels would become ambiguous), or if the history record name is blank.
    pub fn validate(&self) -> Result<()> {
        if self.label_prefix.trim().is_empty() {
            return Err(RevlineError::InvalidConfig {
                reason: "label_prefix must not be empty".to_string(),
            });
        }
        if self
            .label_prefix
            .chars()
            .last()
            .is_some_and(|c| c.is_ascii_digit())
        {
            return Err(RevlineError::InvalidConfig {
                reason: format!("label_prefix '{}' must not end in a digit", self.label_prefix),
            });
        }
        if self.history_record_name.trim().is_empty() {
            return Err(RevlineError::InvalidConfig {
                reason: "history_record_name must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Compiled noise patterns for the diff interpreter
    ///
    /// A non-empty list always also ignores `<history_record_name>.*`, so the
    /// engine's own record rewrites never count as change under any name.
    pub fn ignore_patterns(&self) -> IgnorePatterns {
        let mut patterns = self.ignored_properties.clone();
        let own_group = format!("{}.*", self.history_record_name);
        if !patterns.is_empty() && !patterns.iter().any(|p| p.trim() == own_group) {
            patterns.push(own_group);
        }
        IgnorePatterns::new(&patterns)
    }
}
