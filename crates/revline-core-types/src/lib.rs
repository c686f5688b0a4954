//! Core types shared across Revline facilities
//!
//! This crate provides foundational types used by both the merge engine
//! and the file boundary:
//!
//! - **Correlation types**: RunId for tagging every event of one merge run
//! - **Schema constants**: Canonical field keys and event names

pub mod correlation;
pub mod schema;

pub use correlation::RunId;
