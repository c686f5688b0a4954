//! Canonical schema constants for structured logging and events
//!
//! These constants ensure consistency across all logging and error reporting.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_RUN_ID: &str = "run_id";
pub const FIELD_STAGE: &str = "stage";

// Entity identifiers checked by stage warnings
pub const FIELD_GLOBAL_ID: &str = "global_id";
pub const FIELD_ELEMENT_ID: &str = "element_id";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";

// Merge stage names
pub const STAGE_INTERPRET: &str = "interpret";
pub const STAGE_IMPORT: &str = "import";
pub const STAGE_VALIDATE: &str = "validate";
pub const STAGE_BUILD: &str = "build";
pub const STAGE_SORT: &str = "sort";
pub const STAGE_ANNOTATE: &str = "annotate";
