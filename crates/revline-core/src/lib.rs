//! Revline Core - revision-history merge engine
//!
//! Every regeneration of a model produces a snapshot with no memory of the
//! ones before it. This crate carries the history of the previous snapshot
//! into the current one:
//! - Diff report parsing and noise filtering (`diff`)
//! - Validated import of prior revisions and links (`history::importer`)
//! - Exactly one new revision per run with meaningful changes (`history::builder`)
//! - Chronological ordering tolerant of corrupted cycles (`history::sorter`)
//! - Rebuilt, content-deduplicated history records (`history::annotator`)
//!
//! The engine is synchronous and works on in-memory [`Snapshot`] graphs; file
//! access lives in `revline-store`.

pub mod config;
pub mod diff;
pub mod engine;
pub mod errors;
pub mod history;
pub mod logging_facility;
pub mod model;
pub mod snapshot;

// Referenced by the exported logging macros
pub use revline_core_types;

// Re-export commonly used types
pub use config::MergeConfig;
pub use engine::{merge_history, merge_history_with, MergeOutcome};
pub use errors::{ExError, ExErrorKind, Result, RevlineError};
pub use history::{AcceptAllValidator, AssignmentValidator, MetadataEvidenceValidator};
pub use snapshot::Snapshot;
