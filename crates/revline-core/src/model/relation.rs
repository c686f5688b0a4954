use serde::{Deserialize, Serialize};

/// Links one Revision to the Elements it touched
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub global_id: String,
    pub revision_id: String,
    pub element_ids: Vec<String>,
}

impl Assignment {
    pub fn new(
        global_id: impl Into<String>,
        revision_id: impl Into<String>,
        element_ids: Vec<String>,
    ) -> Self {
        Self {
            global_id: global_id.into(),
            revision_id: revision_id.into(),
            element_ids,
        }
    }

    pub fn links(&self, element_id: &str) -> bool {
        self.element_ids.iter().any(|id| id == element_id)
    }
}

/// "Happened immediately before" edge between two Revisions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ordering {
    pub global_id: String,
    pub predecessor_id: String,
    pub successor_id: String,
}

impl Ordering {
    pub fn new(
        global_id: impl Into<String>,
        predecessor_id: impl Into<String>,
        successor_id: impl Into<String>,
    ) -> Self {
        Self {
            global_id: global_id.into(),
            predecessor_id: predecessor_id.into(),
            successor_id: successor_id.into(),
        }
    }
}
