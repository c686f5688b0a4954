use serde::{Deserialize, Serialize};

/// An addressable node of the model graph
///
/// Elements are owned by the external snapshot layer. The merge engine only
/// reads them and links relations and metadata to them by `global_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    /// Persistent, globally unique identifier
    pub global_id: String,

    /// Schema type name of the element (e.g. "IfcWall")
    #[serde(default)]
    pub entity_type: String,

    /// Optional human-readable name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Element {
    pub fn new(global_id: impl Into<String>, entity_type: impl Into<String>) -> Self {
        Self {
            global_id: global_id.into(),
            entity_type: entity_type.into(),
            name: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}
