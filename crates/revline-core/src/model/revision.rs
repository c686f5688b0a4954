use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// A recorded historical update event
///
/// Revisions are created once, by the run that detected the change, and then
/// carried forward verbatim by every later run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Revision {
    /// Persistent identifier, stable across snapshots
    pub global_id: String,

    /// Human label, normally `<prefix><integer>` (e.g. "PM3")
    pub label: String,

    /// Optional human-readable name for the update
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    /// Summary of what the update changed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// RFC 3339 timestamp of the update, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule_time: Option<String>,
}

impl Revision {
    pub fn new(global_id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            global_id: global_id.into(),
            label: label.into(),
            name: None,
            status: None,
            description: None,
            schedule_time: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_schedule_time(mut self, schedule_time: impl Into<String>) -> Self {
        self.schedule_time = Some(schedule_time.into());
        self
    }

    /// Parsed schedule time; `None` when absent or not RFC 3339
    pub fn scheduled_at(&self) -> Option<DateTime<FixedOffset>> {
        self.schedule_time
            .as_deref()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
    }
}
