//! History stages of a merge run.
//!
//! Stages run strictly in order, each depending on identifier state left by
//! the one before:
//!
//! 1. [`importer`]: clone prior revisions, orderings and validated links
//! 2. [`builder`]: create the run's single revision
//! 3. [`annotator`]: rebuild and deduplicate history records
//!
//! [`validator`] is consulted by the importer, [`sorter`] by the annotator.

pub mod annotator;
pub mod builder;
pub mod importer;
pub mod label;
pub mod sorter;
pub mod validator;

pub use annotator::{
    annotate_history, history_signature, AnnotationReport, FallbackEntry, HISTORY_KEY, LATEST_KEY,
};
pub use builder::{build_revision, render_description, BuildOutcome, COMPLETED_STATUS};
pub use importer::{import_history, ImportReport, RejectedLink};
pub use sorter::{chronological_order, ChronologicalOrder};
pub use validator::{
    AcceptAllValidator, AssignmentValidator, MetadataEvidenceValidator, RejectReason, Verdict,
    GENERIC_FALLBACK,
};
