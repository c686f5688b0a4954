//! Revline Store - file access for the revision-history merge engine
//!
//! Provides:
//! - Snapshot, diff report and configuration loading
//! - Atomic snapshot writes (temp→rename)
//! - File-to-file merge runs with boundary logging

pub mod atomic;
pub mod errors;
pub mod files;
pub mod run;

pub use errors::Result;
pub use files::{load_config, load_diff_report, load_snapshot, save_snapshot};
pub use run::{merge_snapshot_files, MergePaths};
