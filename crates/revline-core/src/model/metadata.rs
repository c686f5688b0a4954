use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A named key→string map shared by one or more Elements
///
/// Keys are kept in a `BTreeMap` so iteration, serialization and signatures
/// are independent of insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataRecord {
    pub global_id: String,
    pub name: String,
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
}

impl MetadataRecord {
    pub fn new(global_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            global_id: global_id.into(),
            name: name.into(),
            properties: BTreeMap::new(),
        }
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Get a property value by key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }
}

/// Attaches one MetadataRecord to a set of Elements
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataAttachment {
    pub global_id: String,
    pub record_id: String,
    pub element_ids: Vec<String>,
}

impl MetadataAttachment {
    pub fn new(
        global_id: impl Into<String>,
        record_id: impl Into<String>,
        element_ids: Vec<String>,
    ) -> Self {
        Self {
            global_id: global_id.into(),
            record_id: record_id.into(),
            element_ids,
        }
    }
}
