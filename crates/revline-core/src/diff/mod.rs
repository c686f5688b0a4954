//! Diff report interpretation.
//!
//! The diff report is computed outside this crate. This module parses it
//! defensively and decides which elements changed meaningfully.
//!
//! ## Entry point
//!
//! ```
//! use revline_core::diff::{interpret, parse_diff_report, IgnorePatterns};
//!
//! let report = parse_diff_report(br#"{"added": ["wall-9"]}"#).unwrap();
//! let summary = interpret(&report, &IgnorePatterns::new(&["*.GlobalId"]));
//! assert_eq!(summary.added, 1);
//! ```

pub mod ignore;
pub mod interpreter;
pub mod report;

pub use ignore::IgnorePatterns;
pub use interpreter::{interpret, ChangeCategory, ChangeKind, ChangeSummary, ElementChange};
pub use report::{
    diff_report_from_value, normalize_path, parse_diff_report, ChangeMetadata, DiffReport,
    PropertyChanges,
};
